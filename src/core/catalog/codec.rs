//! Catalog wire codec
//!
//! The remote payload is MessagePack with positional array records, framed
//! in gzip.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use super::CatalogDocument;

/// Failure to decode a catalog payload.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Corrupt or truncated gzip stream.
    #[error("failed to decompress catalog: {0}")]
    Compression(#[source] std::io::Error),

    /// The inflated bytes do not match the record layout.
    #[error("failed to deserialize catalog: {0}")]
    Schema(#[source] rmp_serde::decode::Error),
}

/// Failure to encode a catalog payload.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] rmp_serde::encode::Error),

    #[error("failed to compress catalog: {0}")]
    Compression(#[source] std::io::Error),
}

/// Decode a gzip-compressed MessagePack catalog payload.
///
/// All-or-nothing: any inflate or deserialization failure rejects the whole
/// payload and the caller keeps whatever catalog it already has.
pub fn decode_catalog(raw: &[u8]) -> Result<CatalogDocument, DecodeError> {
    let mut inflated = Vec::new();
    GzDecoder::new(raw)
        .read_to_end(&mut inflated)
        .map_err(DecodeError::Compression)?;

    rmp_serde::from_slice(&inflated).map_err(DecodeError::Schema)
}

/// Encode a catalog document into the wire format.
///
/// Inverse of [`decode_catalog`]; used by `hangar pack` to produce a payload
/// from a JSON document.
pub fn encode_catalog(document: &CatalogDocument) -> Result<Vec<u8>, EncodeError> {
    let packed = rmp_serde::to_vec(document).map_err(EncodeError::Serialize)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&packed).map_err(EncodeError::Compression)?;
    encoder.finish().map_err(EncodeError::Compression)
}

#[cfg(test)]
mod tests {
    use super::super::{BetaProject, Group, Package, Palette, Project};
    use super::*;

    fn sample_palette() -> Palette {
        Palette {
            primary: "#1B2838".to_string(),
            secondary: "#66C0F4".to_string(),
            circle1: "#C7D5E0".to_string(),
            circle2: "#2A475E".to_string(),
            circle3: "#171A21".to_string(),
            circle4: "#417A9B".to_string(),
            circle5: "#E3E3E3".to_string(),
        }
    }

    fn sample_project(name: &str) -> Project {
        Project {
            name: name.to_string(),
            version: "1.2.0".to_string(),
            date: "2025-11-02".to_string(),
            changelog: "Fixed gear animation".to_string(),
            overview: "Short overview".to_string(),
            description: "Longer description".to_string(),
            background: "https://cdn.example.com/bg.png".to_string(),
            page_background: None,
            variants: None,
            package: None,
        }
    }

    fn sample_group(name: &str) -> Group {
        Group {
            name: name.to_string(),
            projects: vec![sample_project("B767")],
            beta: BetaProject {
                background: "https://cdn.example.com/beta.png".to_string(),
            },
            logo: "https://cdn.example.com/logo.svg".to_string(),
            update: None,
            path: "/lunar-sim".to_string(),
            palette: sample_palette(),
            hide: None,
        }
    }

    #[test]
    fn test_roundtrip_single_group() {
        let mut document = CatalogDocument::new();
        document.insert("lunar-sim".to_string(), sample_group("Lunar Sim"));

        let bytes = encode_catalog(&document).unwrap();
        let decoded = decode_catalog(&bytes).unwrap();
        assert_eq!(document, decoded);
    }

    #[test]
    fn test_roundtrip_populated_optionals() {
        let mut group = sample_group("Aero Dynamics");
        group.update = Some(false);
        group.hide = Some(true);
        group.projects[0].page_background =
            Some("https://cdn.example.com/page.png".to_string());
        group.projects[0].variants =
            Some(vec!["DC10".to_string(), "KC10".to_string()]);
        group.projects[0].package = Some(Package {
            owner: "aero-dynamics".to_string(),
            repo_name: "dc10".to_string(),
            version: "2.0.1".to_string(),
            file_name: "dc10-2.0.1.zip".to_string(),
        });

        let mut document = CatalogDocument::new();
        document.insert("aero-dynamics".to_string(), group);

        let bytes = encode_catalog(&document).unwrap();
        let decoded = decode_catalog(&bytes).unwrap();
        assert_eq!(document, decoded);
        assert_eq!(decoded["aero-dynamics"].hide, Some(true));
    }

    #[test]
    fn test_roundtrip_zero_projects_and_unicode_names() {
        let mut group = sample_group("Délta Sim ✈");
        group.projects.clear();
        group.logo = String::new();

        let mut document = CatalogDocument::new();
        document.insert("délta-sim".to_string(), group);
        document.insert("ouroboros".to_string(), sample_group("Ouroboros Jets"));

        let bytes = encode_catalog(&document).unwrap();
        let decoded = decode_catalog(&bytes).unwrap();
        assert_eq!(document, decoded);
        assert!(decoded["délta-sim"].projects.is_empty());
    }

    #[test]
    fn test_decode_rejects_truncated_gzip() {
        let mut document = CatalogDocument::new();
        document.insert("lunar-sim".to_string(), sample_group("Lunar Sim"));
        let mut bytes = encode_catalog(&document).unwrap();
        bytes.truncate(bytes.len() / 2);

        match decode_catalog(&bytes) {
            Err(DecodeError::Compression(_)) => {}
            other => panic!("expected compression error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_garbage_payload() {
        // Valid gzip frame around bytes that are not a catalog.
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"not a catalog").unwrap();
        let bytes = encoder.finish().unwrap();

        match decode_catalog(&bytes) {
            Err(DecodeError::Schema(_)) => {}
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
