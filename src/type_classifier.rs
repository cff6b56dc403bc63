/// Decides whether a holiday type label counts as an official holiday.
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    keywords: Vec<String>,
}

impl TypeClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn is_accepted(&self, type_label: &str) -> bool {
        let label = type_label.to_lowercase();
        if label.is_empty() {
            return false;
        }
        self.keywords.iter().any(|k| label.contains(k.as_str()))
    }
}
