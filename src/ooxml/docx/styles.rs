/// Paragraph style names from `word/styles.xml`.
use crate::common::xml::unescape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::opc::error::OpcError;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Maps style ids (`Heading1`) to display names (`heading 1`).
#[derive(Debug, Default, Clone)]
pub struct StyleNames {
    names: HashMap<String, String>,
}

impl StyleNames {
    /// Parse the content of a styles part.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut names = HashMap::new();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut current_id: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"style" => {
                        current_id = None;
                        for attr in e.attributes().flatten() {
                            if attr.key.local_name().as_ref() == b"styleId" {
                                current_id = std::str::from_utf8(&attr.value)
                                    .ok()
                                    .map(unescape_xml);
                            }
                        }
                    },
                    b"name" => {
                        if let Some(id) = current_id.as_ref() {
                            for attr in e.attributes().flatten() {
                                if attr.key.local_name().as_ref() == b"val" {
                                    if let Ok(raw) = std::str::from_utf8(&attr.value) {
                                        names.insert(id.clone(), unescape_xml(raw));
                                    }
                                }
                            }
                        }
                    },
                    _ => {},
                },
                Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => current_id = None,
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("styles: {}", e)).into()),
                _ => {},
            }
        }

        Ok(Self { names })
    }

    /// Display name for a style id, when the styles part defines one.
    pub fn name(&self, style_id: &str) -> Option<&str> {
        self.names.get(style_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
