use scraper::{ElementRef, Html, Node, Selector};

const NOISE_TAGS: [&str; 8] = [
    "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript",
];

const CONTENT_ROOTS: [&str; 4] = ["main", "div#main", r#"div[role="main"]"#, "body"];

pub fn clean_page_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut pieces = vec![];
    match find_content_root(&document) {
        Some(root) => collect_text(root, &mut pieces),
        None => collect_text(document.root_element(), &mut pieces),
    }

    normalize_whitespace(&pieces.join(" "))
}

pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|title| normalize_whitespace(&title.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn find_content_root(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_ROOTS.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document.select(&selector).find(|el| !inside_noise(el))
    })
}

fn is_noise(element: &ElementRef) -> bool {
    NOISE_TAGS.contains(&element.value().name())
}

fn inside_noise(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_noise(&ancestor))
}

fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    if is_noise(&element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pieces.push(text);
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, pieces);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_page_text, normalize_whitespace, page_title};

    const STATIC_PAGE: &str = r#"
        <html>
          <head>
            <title>  Rust Release   Notes </title>
            <style>body { color: red; }</style>
          </head>
          <body>
            <header><h1>Site Banner</h1></header>
            <nav><a href="/">Home</a><a href="/blog">Blog</a></nav>
            <main>
              <h2>Version   1.80</h2>
              <p>Stabilized
                 LazyCell and LazyLock.</p>
              <script>trackVisitor();</script>
              <aside>Sponsored</aside>
              <p>Exclusive ranges in <code>match</code> patterns.</p>
            </main>
            <footer>Copyright</footer>
          </body>
        </html>
    "#;

    #[test]
    fn main_landmark_is_preferred_over_chrome() {
        let text = clean_page_text(STATIC_PAGE);

        assert_eq!(
            text,
            "Version 1.80 Stabilized LazyCell and LazyLock. Exclusive ranges in match patterns."
        );
    }

    #[test]
    fn cleaning_is_idempotent_on_static_page() {
        assert_eq!(clean_page_text(STATIC_PAGE), clean_page_text(STATIC_PAGE));
    }

    #[test]
    fn role_main_div_is_used_when_no_main_tag() {
        let html = r#"<body><nav>Menu</nav><div role="main">Article body</div><p>Other</p></body>"#;

        assert_eq!(clean_page_text(html), "Article body");
    }

    #[test]
    fn falls_back_to_body_without_noise() {
        let html = "<body><div>First</div>\n\n<script>var x = 1;</script><div>\tSecond </div></body>";

        assert_eq!(clean_page_text(html), "First Second");
    }

    #[test]
    fn main_inside_noise_is_ignored() {
        let html = "<body><header><main>Header main</main></header><p>Real text</p></body>";

        assert_eq!(clean_page_text(html), "Real text");
    }

    #[test]
    fn page_with_only_chrome_has_no_text() {
        let html = "<body><nav>Menu</nav><footer>Links</footer></body>";

        assert!(clean_page_text(html).is_empty());
    }

    #[test]
    fn title_is_whitespace_normalized() {
        assert_eq!(page_title(STATIC_PAGE).as_deref(), Some("Rust Release Notes"));
        assert_eq!(page_title("<body>No title</body>"), None);
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(normalize_whitespace("  a \n\t b   c "), "a b c");
    }
}
