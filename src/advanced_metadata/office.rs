//! Lectura de metadata en documentos DOCX empaquetados en ZIP.

use super::{ExtractedMetadata, FormatExtractor};
use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use xmltree::{Element, XMLNode};
use zip::ZipArchive;
use zip::result::ZipError;

pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";

const CORE_PART: &str = "docProps/core.xml";
const APP_PART: &str = "docProps/app.xml";

struct FieldSpec {
    key: &'static str,
    local_name: &'static str,
    namespace: &'static str,
}

const CORE_FIELDS: [FieldSpec; 9] = [
    FieldSpec {
        key: "title",
        local_name: "title",
        namespace: DC_NS,
    },
    FieldSpec {
        key: "subject",
        local_name: "subject",
        namespace: DC_NS,
    },
    FieldSpec {
        key: "creator",
        local_name: "creator",
        namespace: DC_NS,
    },
    FieldSpec {
        key: "keywords",
        local_name: "keywords",
        namespace: CP_NS,
    },
    FieldSpec {
        key: "description",
        local_name: "description",
        namespace: DC_NS,
    },
    FieldSpec {
        key: "last_modified_by",
        local_name: "lastModifiedBy",
        namespace: CP_NS,
    },
    FieldSpec {
        key: "revision",
        local_name: "revision",
        namespace: CP_NS,
    },
    FieldSpec {
        key: "created",
        local_name: "created",
        namespace: DCTERMS_NS,
    },
    FieldSpec {
        key: "modified",
        local_name: "modified",
        namespace: DCTERMS_NS,
    },
];

const APP_FIELDS: [&str; 6] = [
    "Application",
    "Pages",
    "Words",
    "Characters",
    "Lines",
    "Paragraphs",
];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocxMetadata {
    pub core: BTreeMap<String, String>,
    pub app: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct DocxExtractor;

impl FormatExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedMetadata> {
        Ok(ExtractedMetadata::Docx(extract_docx_metadata(path)))
    }
}

/// Lee `docProps/core.xml` y `docProps/app.xml`; las partes ausentes no son errores.
pub fn extract_docx_metadata(path: &Path) -> DocxMetadata {
    let mut metadata = DocxMetadata::default();

    let archive = File::open(path)
        .map_err(|error| ExtractError::io(path, error))
        .and_then(|file| ZipArchive::new(file).map_err(ExtractError::from));
    let mut archive = match archive {
        Ok(archive) => archive,
        Err(error) => {
            warn!(path = %path.display(), %error, "no se pudo abrir el contenedor DOCX");
            metadata.error = Some(error.to_string());
            return metadata;
        }
    };

    match read_xml_part(&mut archive, CORE_PART) {
        Ok(Some(root)) => metadata.core = core_properties(&root),
        Ok(None) => {}
        Err(error) => record_part_error(path, CORE_PART, &error, &mut metadata),
    }
    match read_xml_part(&mut archive, APP_PART) {
        Ok(Some(root)) => metadata.app = app_properties(&root),
        Ok(None) => {}
        Err(error) => record_part_error(path, APP_PART, &error, &mut metadata),
    }
    debug!(
        path = %path.display(),
        core = metadata.core.len(),
        app = metadata.app.len(),
        "DOCX leído"
    );

    metadata
}

/// Conserva sólo el primer error; cada parte se lee por separado.
fn record_part_error(path: &Path, part: &str, error: &ExtractError, metadata: &mut DocxMetadata) {
    warn!(path = %path.display(), part, %error, "propiedades DOCX ilegibles");
    if metadata.error.is_none() {
        metadata.error = Some(error.to_string());
    }
}

fn read_xml_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Element>> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let mut contents = Vec::new();
    part.read_to_end(&mut contents)
        .map_err(|error| ExtractError::io(name, error))?;
    Ok(Some(Element::parse(contents.as_slice())?))
}

fn core_properties(root: &Element) -> BTreeMap<String, String> {
    CORE_FIELDS
        .iter()
        .filter_map(|field| {
            find_child(root, field.local_name, Some(field.namespace))
                .map(|child| (field.key.to_string(), element_text_content(child)))
        })
        .collect()
}

fn app_properties(root: &Element) -> BTreeMap<String, String> {
    APP_FIELDS
        .iter()
        .filter_map(|name| {
            find_child(root, name, None)
                .map(|child| (name.to_lowercase(), element_text_content(child)))
        })
        .collect()
}

fn find_child<'a>(root: &'a Element, local_name: &str, namespace: Option<&str>) -> Option<&'a Element> {
    root.children.iter().find_map(|node| match node {
        XMLNode::Element(child) if child.name == local_name && namespace_matches(child, namespace) => {
            Some(child)
        }
        _ => None,
    })
}

fn namespace_matches(element: &Element, namespace: Option<&str>) -> bool {
    match (namespace, element.namespace.as_deref()) {
        (Some(expected), Some(actual)) => expected == actual,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

fn element_text_content(element: &Element) -> String {
    let mut content = String::new();
    for node in &element.children {
        match node {
            XMLNode::Text(text) | XMLNode::CData(text) => content.push_str(text),
            _ => {}
        }
    }
    content
}
