use worksheet_export::document::{baseline_packages, LatexDocument};
use worksheet_export::preamble::{DocumentClass, Package, Preamble};
use worksheet_export::styles::DocumentStyles;

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn detected_class_and_package_appear_exactly_once() {
    let markup = "\\documentclass{article}
\\usepackage{enumitem}
\\begin{document}
\\section{Practice Exercises}
\\end{document}";

    let preamble = Preamble::split(markup);
    assert_eq!(preamble.packages, vec![Package::new("enumitem")]);

    let source = LatexDocument::from_preamble(preamble, &DocumentStyles::default()).to_source();

    assert_eq!(count(&source, "\\documentclass"), 1);
    assert_eq!(count(&source, "\\begin{document}"), 1);
    assert_eq!(count(&source, "\\end{document}"), 1);
    for package in [
        "\\usepackage{amsmath}",
        "\\usepackage{amssymb}",
        "\\usepackage{graphicx}",
        "\\usepackage[margin=1in]{geometry}",
        "\\usepackage{enumitem}",
    ] {
        assert_eq!(count(&source, package), 1, "{package} in:\n{source}");
    }
    assert_eq!(count(&source, "\\usepackage"), 5);
}

#[test]
fn packages_repeating_the_baseline_are_not_duplicated() {
    let markup = "\\usepackage{amsmath}\n\\usepackage{amsmath,graphicx}\nBody";
    let document =
        LatexDocument::from_preamble(Preamble::split(markup), &DocumentStyles::default());

    let names: Vec<&str> = document.packages().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["amsmath", "amssymb", "graphicx", "geometry"]);
}

#[test]
fn repeated_package_options_are_merged() {
    let markup = "\\usepackage[landscape]{geometry}\nBody";
    let source = LatexDocument::from_preamble(Preamble::split(markup), &DocumentStyles::default())
        .to_source();

    assert!(source.contains("\\usepackage[margin=1in,landscape]{geometry}"));
    assert_eq!(count(&source, "{geometry}"), 1);
}

#[test]
fn structure_order() {
    let source = LatexDocument::from_preamble(
        Preamble::split("\\documentclass[11pt]{article}\n\\usepackage{xcolor}\nHello"),
        &DocumentStyles::default(),
    )
    .to_source();

    assert_eq!(
        source,
        "\\documentclass[11pt]{article}
\\usepackage{amsmath}
\\usepackage{amssymb}
\\usepackage{graphicx}
\\usepackage[margin=1in]{geometry}
\\usepackage{xcolor}
\\begin{document}
Hello
\\end{document}
"
    );
}

#[test]
fn default_class_comes_from_styles() {
    let styles = DocumentStyles {
        document_class: "report".to_string(),
        margin: "2cm".to_string(),
    };
    let document = LatexDocument::from_preamble(Preamble::split("Body"), &styles);

    assert_eq!(document.class(), &DocumentClass::new("report"));
    assert!(document.to_source().contains("\\usepackage[margin=2cm]{geometry}"));
}

#[test]
fn body_is_appended_verbatim() {
    let body = "Score: 50\\% of $x^2 & y_1$ {\\bf bold} #1 ~";
    let mut document = LatexDocument::new(DocumentClass::new("article"));
    document.append(body);

    assert!(document.to_source().contains(body));
}

#[test]
fn baseline_is_math_symbols_graphics_margins() {
    let names: Vec<String> = baseline_packages(&DocumentStyles::default())
        .into_iter()
        .map(|p| p.to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "\\usepackage{amsmath}",
            "\\usepackage{amssymb}",
            "\\usepackage{graphicx}",
            "\\usepackage[margin=1in]{geometry}",
        ]
    );
}
