//! Integration tests focused on error handling and edge cases.
//!
//! These tests ensure the loaders and the tracker identify and report
//! malformed XML, missing or invalid attributes, inconsistent templates and
//! malformed paths, without panicking.

use scl_rs_dtt::{
    DataPath, ErrorKind, LogicalNode, ObjectReference, Registry, SclError, TemplateKind, Tracker,
    load_ldevice_from_str, load_scl_from_str, load_templates_from_str,
};

/// A minimal valid template section used as a base for corrupted test cases.
const MINIMAL_TEMPLATES: &str = r#"<DataTypeTemplates>
  <LNodeType id="GGIO_T" lnClass="GGIO">
    <DO name="Ind" type="SPS_T"/>
  </LNodeType>
  <DOType id="SPS_T" cdc="SPS">
    <DA name="stVal" fc="ST" bType="BOOLEAN"/>
    <DA name="q" fc="ST" bType="Quality"/>
  </DOType>
</DataTypeTemplates>"#;

#[test]
fn test_minimal_templates_are_valid() {
    let section = load_templates_from_str(MINIMAL_TEMPLATES).expect("Base fixture must parse");
    assert!(Registry::load(section).is_ok());
}

#[test]
fn test_malformed_xml() {
    let truncated = &MINIMAL_TEMPLATES[..MINIMAL_TEMPLATES.len() - 10];
    let result = load_templates_from_str(truncated);
    assert!(matches!(result, Err(SclError::XmlParsing(_))), "{:?}", result);

    let result = load_ldevice_from_str("<LDevice inst=\"LD1\"><LN0></LDevice>");
    assert!(matches!(result, Err(SclError::XmlParsing(_))), "{:?}", result);

    let result = load_scl_from_str("");
    assert!(result.is_err());
}

#[test]
fn test_missing_mandatory_attributes() {
    let xml = MINIMAL_TEMPLATES.replace(r#"<LNodeType id="GGIO_T" "#, "<LNodeType ");
    let result = load_templates_from_str(&xml);
    assert!(matches!(
        result,
        Err(SclError::MissingAttribute {
            element: "LNodeType",
            attribute: "id"
        })
    ));

    let xml = MINIMAL_TEMPLATES.replace(r#"cdc="SPS""#, "");
    let result = load_templates_from_str(&xml);
    assert!(matches!(
        result,
        Err(SclError::MissingAttribute {
            element: "DOType",
            attribute: "cdc"
        })
    ));

    // `fc` is optional on a BDA but mandatory on a DA.
    let xml = MINIMAL_TEMPLATES.replace(r#"<DA name="q" fc="ST""#, r#"<DA name="q""#);
    let result = load_templates_from_str(&xml);
    assert!(matches!(
        result,
        Err(SclError::MissingAttribute {
            element: "DA",
            attribute: "fc"
        })
    ));

    let result = load_ldevice_from_str(r#"<LDevice><LN0 lnClass="LLN0" lnType="LLN0_T"/></LDevice>"#);
    assert!(matches!(
        result,
        Err(SclError::MissingAttribute {
            element: "LDevice",
            attribute: "inst"
        })
    ));
}

#[test]
fn test_invalid_attribute_values() {
    let cases = [
        (r#"bType="BOOLEAN""#, r#"bType="BOOL""#, "bType"),
        (r#"fc="ST" bType="Quality""#, r#"fc="ZZ" bType="Quality""#, "fc"),
        (
            r#"bType="BOOLEAN""#,
            r#"bType="BOOLEAN" valKind="Fixed""#,
            "valKind",
        ),
        (r#"bType="BOOLEAN""#, r#"bType="BOOLEAN" count="two""#, "count"),
        (
            r#"bType="BOOLEAN""#,
            r#"bType="BOOLEAN" valImport="maybe""#,
            "valImport",
        ),
    ];
    for (from, to, expected) in cases {
        let xml = MINIMAL_TEMPLATES.replace(from, to);
        match load_templates_from_str(&xml) {
            Err(SclError::InvalidAttributeFormat { attribute, .. }) => {
                assert_eq!(attribute, expected, "replacing {}", from)
            }
            other => panic!("Expected InvalidAttributeFormat for {}, got {:?}", to, other),
        }
    }

    let ldevice = r#"<LDevice inst="LD1">
      <LN lnClass="GGIO" inst="1" lnType="GGIO_T">
        <DOI name="Ind" ix="first"/>
      </LN>
    </LDevice>"#;
    let err = load_ldevice_from_str(ldevice).unwrap_err();
    assert!(matches!(err, SclError::InvalidAttributeFormat { attribute: "ix", .. }));

    let ldevice = r#"<LDevice inst="LD1">
      <LN lnClass="GGIO" inst="1" lnType="GGIO_T">
        <DOI name="Ind"><DAI name="stVal"><Val sGroup="-1">true</Val></DAI></DOI>
      </LN>
    </LDevice>"#;
    let err = load_ldevice_from_str(ldevice).unwrap_err();
    assert!(matches!(err, SclError::InvalidAttributeFormat { attribute: "sGroup", .. }));
}

#[test]
fn test_duplicate_template_ids() {
    let xml = MINIMAL_TEMPLATES.replace(
        "</DataTypeTemplates>",
        r#"<DOType id="SPS_T" cdc="SPS"><DA name="stVal" fc="ST" bType="BOOLEAN"/></DOType></DataTypeTemplates>"#,
    );
    let section = load_templates_from_str(&xml).unwrap();
    match Registry::load(section) {
        Err(SclError::DuplicateTemplateId { kind, id }) => {
            assert_eq!(kind, TemplateKind::DoType);
            assert_eq!(id, "SPS_T");
        }
        other => panic!("Expected DuplicateTemplateId, got {:?}", other),
    }
}

#[test]
fn test_malformed_paths() {
    for bad in ["", "Ind..stVal", "Ind.", "Ind(1.stVal", "Ind(x).stVal", "Ind().stVal", "In-d"] {
        let err = bad.parse::<DataPath>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath, "{:?}", bad);
    }
    for bad in ["LD1", "LD1/", "/GGIO1.Ind", "LD1/GGIO1", "LD1/GGIO1.", "LD1/a/GGIO1.Ind"] {
        assert!(bad.parse::<ObjectReference>().is_err(), "{:?}", bad);
    }

    let registry = Registry::load(load_templates_from_str(MINIMAL_TEMPLATES).unwrap()).unwrap();
    let tracker = Tracker::new(&registry);
    let ln = LogicalNode::new("GGIO", "1", "GGIO_T");
    let err = tracker.resolve_str(&ln, "Ind.st Val").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    let err = tracker.resolve(&ln, &DataPath::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
}

/// Errors display a readable message naming the failing prefix.
#[test]
fn test_error_messages() {
    let registry = Registry::load(load_templates_from_str(MINIMAL_TEMPLATES).unwrap()).unwrap();
    let tracker = Tracker::new(&registry);
    let ln = LogicalNode::new("GGIO", "1", "GGIO_T");

    let err = tracker.resolve_str(&ln, "Ind.stVal.x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.prefix().map(ToString::to_string), Some("Ind.stVal".to_string()));
    assert!(!err.to_string().is_empty());

    let err = tracker.resolve_str(&ln, "Pos.stVal").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
    assert_eq!(err.prefix().map(DataPath::len), Some(0));
}
