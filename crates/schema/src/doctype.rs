use crate::error::SchemaError;
use serde::{Deserialize, Serialize};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" ?>\n";

/// A document type declaration a root element may carry.
///
/// The XML identifiers are mandatory. The SGML identifiers are present only
/// if the doctype has an SGML-compatible (non-XML) equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocType {
    pub name: String,
    #[serde(default)]
    pub public_id: Option<String>,
    pub system_id: String,
    #[serde(default)]
    pub sgml_public_id: Option<String>,
    #[serde(default)]
    pub sgml_system_id: Option<String>,
}

impl DocType {
    pub fn new(
        name: impl Into<String>,
        public_id: Option<&str>,
        system_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.into(),
            sgml_public_id: None,
            sgml_system_id: None,
        }
    }

    pub fn with_sgml(mut self, public_id: Option<&str>, system_id: impl Into<String>) -> Self {
        self.sgml_public_id = public_id.map(str::to_string);
        self.sgml_system_id = Some(system_id.into());
        self
    }

    pub fn is_sgml_compatible(&self) -> bool {
        self.sgml_system_id.is_some()
    }

    /// A public id without a system id cannot be rendered.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.sgml_public_id.is_some() && self.sgml_system_id.is_none() {
            return Err(SchemaError::invalid_doctype(
                &self.name,
                "SGML public id given without an SGML system id",
            ));
        }
        Ok(())
    }

    pub fn to_xml(&self, root_element: &str) -> String {
        let mut out = String::from(XML_DECLARATION);
        out.push_str(&markup(
            root_element,
            self.public_id.as_deref(),
            &self.system_id,
        ));
        out
    }

    /// `None` if there is no SGML-compatible form.
    pub fn to_sgml(&self, root_element: &str) -> Option<String> {
        let system_id = self.sgml_system_id.as_deref()?;
        Some(markup(
            &root_element.to_uppercase(),
            self.sgml_public_id.as_deref(),
            system_id,
        ))
    }
}

fn markup(root_element: &str, public_id: Option<&str>, system_id: &str) -> String {
    match public_id {
        Some(public_id) => format!(
            "<!DOCTYPE {} PUBLIC \"{}\" \"{}\">",
            root_element, public_id, system_id
        ),
        None => format!("<!DOCTYPE {} SYSTEM \"{}\">", root_element, system_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> DocType {
        DocType::new(
            "strict",
            Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
            "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
        )
        .with_sgml(
            Some("-//W3C//DTD HTML 4.01//EN"),
            "http://www.w3.org/TR/html4/strict.dtd",
        )
    }

    #[test]
    fn test_xml_form_has_declaration_and_ids() {
        assert_eq!(
            strict().to_xml("html"),
            "<?xml version=\"1.0\" ?>\n<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
             \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">"
        );
    }

    #[test]
    fn test_sgml_form_upper_cases_root() {
        assert_eq!(
            strict().to_sgml("html").as_deref(),
            Some("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">")
        );
    }

    #[test]
    fn test_system_only_doctype() {
        let dt = DocType::new("plain", None, "plain.dtd");
        assert!(!dt.is_sgml_compatible());
        assert_eq!(dt.to_sgml("x"), None);
        assert!(dt.to_xml("x").ends_with("<!DOCTYPE x SYSTEM \"plain.dtd\">"));
    }

    #[test]
    fn test_validate_rejects_public_without_system() {
        let mut dt = DocType::new("bad", None, "x.dtd");
        dt.sgml_public_id = Some("-//X//EN".to_string());
        assert!(matches!(dt.validate(), Err(SchemaError::InvalidDocType { .. })));
    }
}
