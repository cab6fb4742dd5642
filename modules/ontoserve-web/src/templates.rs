//! HTML rendering for the generated listing pages.
//!
//! The documents are deliberately minimal: a title, a heading and a list
//! or table. The per-ontology HTML representations are authored upstream
//! and served verbatim, so nothing here touches them.

use ontoserve_store::OntologySummary;

/// Render the ontology-type listing served at `/`.
pub fn render_ontology_types(ontology_types: &[String], lang: &str) -> String {
    let title = match lang {
        "nn" => "Ontologi-typar",
        "en" => "Ontology-types",
        _ => "Ontologi-typer",
    };

    let mut items = String::new();
    for ontology_type in ontology_types {
        let name = html_escape(ontology_type);
        items.push_str(&format!(r#"<li><a href="{name}">{name}</a></li>"#));
    }

    build_document(lang, title, &format!("<ul>{items}</ul>"))
}

/// Render the ontology listing for one type.
pub fn render_ontology_list(
    ontology_type: &str,
    ontologies: &[OntologySummary],
    lang: &str,
) -> String {
    let title = title_case(ontology_type);

    let mut rows = String::new();
    for ontology in ontologies {
        let name = html_escape(&ontology.name);
        let path = html_escape(ontology_type);
        rows.push_str(&format!(
            r#"<tr><td><a href="{path}/{name}">{name}</a></td><td>last updated: {}</td></tr>"#,
            html_escape(&ontology.last_modified)
        ));
    }

    build_document(lang, &title, &format!("<table>{rows}</table>"))
}

/// The small English not-found page for unknown ontology types.
pub fn render_not_found() -> String {
    r#"<!doctype html>
<html lang="en">
    <head>
        <title>Not found</title>
    </head>
    <body>
        <p>The page you are looking for does not exist.</p>
    </body>
</html>"#
        .to_string()
}

fn build_document(lang: &str, title: &str, content: &str) -> String {
    format!(
        r#"<!doctype html><html lang="{lang}"><title>{title}</title><body><h2>{title}</h2>{content}</body>"#,
        lang = html_escape(lang),
        title = html_escape(title),
    )
}

/// Title-case a type name the way the listing expects:
/// `contract-test` becomes `Contract-Test`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_ascii_alphabetic() {
            if at_word_start {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c.to_ascii_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_handles_hyphenated_names() {
        assert_eq!(title_case("contract-test"), "Contract-Test");
        assert_eq!(title_case("vocabularies"), "Vocabularies");
        assert_eq!(title_case("SPECIFICATIONS"), "Specifications");
    }

    #[test]
    fn type_listing_carries_lang_and_localized_title() {
        let html = render_ontology_types(&["examples".to_string()], "nn");
        assert!(html.contains(r#"<html lang="nn">"#));
        assert!(html.contains("<title>Ontologi-typar</title>"));
        assert!(html.contains(r#"<li><a href="examples">examples</a></li>"#));
    }

    #[test]
    fn ontology_listing_links_into_the_type() {
        let ontologies = vec![OntologySummary {
            name: "hello-world".to_string(),
            last_modified: "2024-01-01 10:00:00".to_string(),
        }];
        let html = render_ontology_list("examples", &ontologies, "nb");
        assert!(html.contains("<title>Examples</title>"));
        assert!(html.contains(r#"<a href="examples/hello-world">hello-world</a>"#));
        assert!(html.contains("last updated: 2024-01-01 10:00:00"));
    }

    #[test]
    fn markup_in_names_is_escaped() {
        let html = render_ontology_types(&["<script>".to_string()], "nb");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
