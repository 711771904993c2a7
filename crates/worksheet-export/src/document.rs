use crate::preamble::{DocumentClass, Package, Preamble};
use crate::styles::DocumentStyles;

/// A LaTeX document assembled from a class, a package list, and a raw body.
///
/// Each package name appears at most once. Declaring a name again merges its
/// options into the first declaration and keeps the original position.
#[derive(Debug, Clone)]
pub struct LatexDocument {
    class: DocumentClass,
    packages: Vec<Package>,
    body: String,
}

impl LatexDocument {
    pub fn new(class: DocumentClass) -> Self {
        Self {
            class,
            packages: Vec::new(),
            body: String::new(),
        }
    }

    /// Rebuild a document from extracted markup: the detected class (or the
    /// styled default), the baseline packages, then the detected packages.
    pub fn from_preamble(preamble: Preamble, styles: &DocumentStyles) -> Self {
        let class = preamble
            .class
            .unwrap_or_else(|| DocumentClass::new(styles.document_class.clone()));

        let mut document = Self::new(class);
        for package in baseline_packages(styles) {
            document.add_package(package);
        }
        for package in preamble.packages {
            document.add_package(package);
        }
        document.append(&preamble.body);
        document
    }

    pub fn class(&self) -> &DocumentClass {
        &self.class
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn add_package(&mut self, package: Package) {
        match self.packages.iter_mut().find(|p| p.name == package.name) {
            Some(existing) => {
                for option in package.options {
                    if !existing.options.contains(&option) {
                        existing.options.push(option);
                    }
                }
            }
            None => self.packages.push(package),
        }
    }

    /// Append raw markup to the body. Nothing is escaped.
    pub fn append(&mut self, markup: &str) {
        if markup.is_empty() {
            return;
        }
        if !self.body.is_empty() && !self.body.ends_with('\n') {
            self.body.push('\n');
        }
        self.body.push_str(markup);
    }

    pub fn to_source(&self) -> String {
        let mut source = String::with_capacity(self.body.len() + 256);
        source.push_str(&self.class.to_string());
        source.push('\n');
        for package in &self.packages {
            source.push_str(&package.to_string());
            source.push('\n');
        }
        source.push_str("\\begin{document}\n");
        source.push_str(&self.body);
        if !self.body.is_empty() && !self.body.ends_with('\n') {
            source.push('\n');
        }
        source.push_str("\\end{document}\n");
        source
    }
}

/// Packages every structured document gets: math, symbols, graphics, margins.
pub fn baseline_packages(styles: &DocumentStyles) -> Vec<Package> {
    vec![
        Package::new("amsmath"),
        Package::new("amssymb"),
        Package::new("graphicx"),
        Package::with_options("geometry", [format!("margin={}", styles.margin)]),
    ]
}
