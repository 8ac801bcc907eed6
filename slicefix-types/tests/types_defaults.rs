use proptest::prelude::*;
use slicefix_types::report::{SlicefixReport, ToolInfo};
use slicefix_types::{Layer, Span};

#[test]
fn report_new_sets_schema_and_defaults() {
    let tool = ToolInfo {
        name: "slicefix".to_string(),
        version: Some("1.2.3".to_string()),
    };
    let report = SlicefixReport::new(tool.clone());

    assert_eq!(report.schema, slicefix_types::schema::SLICEFIX_REPORT_V1);
    assert_eq!(report.tool.name, tool.name);
    assert!(report.inputs.is_empty());
    assert!(report.findings.is_empty());
    assert_eq!(report.summary.findings, 0);
    assert!(report.file_hashes.is_empty());
}

#[test]
fn empty_span_does_not_overlap() {
    let a = Span { start: 4, end: 4 };
    let b = Span { start: 0, end: 10 };
    assert!(a.is_empty());
    assert!(!b.overlaps(&Span { start: 10, end: 12 }));
    assert!(b.overlaps(&Span { start: 9, end: 12 }));
}

proptest! {
    #[test]
    fn span_overlap_is_symmetric(a in 0u64..100, al in 0u64..20, b in 0u64..100, bl in 0u64..20) {
        let x = Span { start: a, end: a + al };
        let y = Span { start: b, end: b + bl };
        prop_assert_eq!(x.overlaps(&y), y.overlaps(&x));
    }

    #[test]
    fn layer_display_parses_back(idx in 0usize..6) {
        let layer = Layer::ALL[idx];
        prop_assert_eq!(layer.to_string().parse::<Layer>().unwrap(), layer);
    }
}
