//! Document kinds and their addressing policies
//!
//! Every kind fixes how many leading segments identify the resource, how
//! many trailing segments form the sub-address of a value, and whether one
//! external segment is a cell reference that expands into a row and a
//! column level of the cache tree.

use serde::{Deserialize, Serialize};

/// Kind of source document behind a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Xls,
    Xlsx,
    Csv,
    Doc,
    Docx,
    Pdf,
    Html,
    Xml,
}

/// Where a cell reference sits in an external path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellReference {
    /// Index of the reference segment in the external path
    pub offset: usize,
    /// Segment required at index 1 for the reference to apply (e.g. `tables`)
    pub selector: Option<&'static str>,
    /// Canonical segments that follow the column level (e.g. a paragraph index)
    pub trailing: usize,
}

/// Addressing policy of a document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPolicy {
    /// Leading segments always consumed as the resource base
    pub base_segments: usize,
    /// Trailing canonical segments reserved for the sub-address of a value
    pub sub_segments: usize,
    /// Cell reference expansion, if the kind has one
    pub cell_reference: Option<CellReference>,
}

impl KindPolicy {
    /// Canonical segments one cell reference expands into, including trailing ones
    pub fn reference_width(&self) -> usize {
        self.cell_reference
            .map(|cell| 2 + cell.trailing)
            .unwrap_or(1)
    }
}

const SPREADSHEET: KindPolicy = KindPolicy {
    base_segments: 2,
    sub_segments: 2,
    cell_reference: Some(CellReference {
        offset: 3,
        selector: None,
        trailing: 0,
    }),
};

const CSV: KindPolicy = KindPolicy {
    base_segments: 1,
    sub_segments: 2,
    cell_reference: Some(CellReference {
        offset: 1,
        selector: None,
        trailing: 0,
    }),
};

const WORD: KindPolicy = KindPolicy {
    base_segments: 2,
    sub_segments: 3,
    cell_reference: Some(CellReference {
        offset: 3,
        selector: Some("tables"),
        trailing: 1,
    }),
};

const PDF: KindPolicy = KindPolicy {
    base_segments: 2,
    sub_segments: 1,
    cell_reference: None,
};

const MARKUP: KindPolicy = KindPolicy {
    base_segments: 1,
    sub_segments: 1,
    cell_reference: None,
};

impl DocumentKind {
    /// Addressing policy for this kind
    pub fn policy(self) -> &'static KindPolicy {
        match self {
            Self::Xls | Self::Xlsx => &SPREADSHEET,
            Self::Csv => &CSV,
            Self::Doc | Self::Docx => &WORD,
            Self::Pdf => &PDF,
            Self::Html | Self::Xml => &MARKUP,
        }
    }

    /// Whether values of this kind live in the value tree (as opposed to
    /// whole-document blobs)
    pub fn is_structured(self) -> bool {
        !matches!(self, Self::Html | Self::Xml)
    }

    /// Detect kind from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "html" | "htm" => Some(Self::Html),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Detect kind from MIME type
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/vnd.ms-excel" => Some(Self::Xls),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(Self::Xlsx)
            }
            "text/csv" => Some(Self::Csv),
            "application/msword" => Some(Self::Doc),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "application/pdf" => Some(Self::Pdf),
            "text/html" => Some(Self::Html),
            "application/xml" | "text/xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Xml => "xml",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert_eq!(DocumentKind::Xlsx.policy(), DocumentKind::Xls.policy());
        assert_eq!(DocumentKind::Csv.policy().base_segments, 1);
        assert_eq!(DocumentKind::Csv.policy().sub_segments, 2);
        assert_eq!(DocumentKind::Docx.policy().sub_segments, 3);
        assert_eq!(DocumentKind::Pdf.policy().base_segments, 2);
        assert!(DocumentKind::Pdf.policy().cell_reference.is_none());
    }

    #[test]
    fn test_reference_width() {
        assert_eq!(DocumentKind::Xlsx.policy().reference_width(), 2);
        assert_eq!(DocumentKind::Docx.policy().reference_width(), 3);
        assert_eq!(DocumentKind::Pdf.policy().reference_width(), 1);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(DocumentKind::from_extension("XLSX"), Some(DocumentKind::Xlsx));
        assert_eq!(DocumentKind::from_extension("htm"), Some(DocumentKind::Html));
        assert_eq!(DocumentKind::from_extension("epub"), None);
    }

    #[test]
    fn test_from_mime() {
        assert_eq!(DocumentKind::from_mime("text/csv"), Some(DocumentKind::Csv));
        assert_eq!(DocumentKind::from_mime("application/pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_mime("image/png"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&DocumentKind::Docx).unwrap();
        assert_eq!(json, "\"docx\"");
        let kind: DocumentKind = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(kind, DocumentKind::Csv);
    }

    #[test]
    fn test_structured_kinds() {
        assert!(DocumentKind::Csv.is_structured());
        assert!(!DocumentKind::Xml.is_structured());
    }
}
