//! End-to-end merge scenarios

use genmerge::{
    MarkerSyntax, MergeError, RegionSpec, RenderContext, SourceMerger, StaticRenderer,
    TrimTrailingWhitespace,
};

fn license_body_specs() -> Vec<RegionSpec> {
    let mut license = RegionSpec::new("License");
    license.optional = true;
    license.editable = false;
    license.head_template = Some("lic".to_string());
    vec![license, RegionSpec::new("Body")]
}

fn license_renderer() -> StaticRenderer {
    let mut renderer = StaticRenderer::new();
    renderer.insert("lic", "/* L */\n");
    renderer
}

#[test]
fn test_empty_input_yields_license_and_empty_body() {
    let merger = SourceMerger::new(license_renderer());
    let result = merger
        .merge("", &license_body_specs(), &RenderContext::new())
        .unwrap();

    assert_eq!(
        result.merged_text,
        "// SECTION-START[License]\n\
         /* L */\n\
         // SECTION-END\n\
         // SECTION-START[Body]\n\
         // SECTION-END\n"
    );
    assert_eq!(result.added_regions, vec!["Body"]);
    assert!(result.changed);
}

#[test]
fn test_remerge_leaves_custom_body_content_alone() {
    let merger = SourceMerger::new(license_renderer());
    let input = "// SECTION-START[License]\n\
                 /* L */\n\
                 // SECTION-END\n\
                 // SECTION-START[Body]\n\
                 custom();\n\
                 // SECTION-END\n";
    let result = merger
        .merge(input, &license_body_specs(), &RenderContext::new())
        .unwrap();

    assert!(result.merged_text.contains("custom();\n"));
    assert_eq!(result.merged_text, input);
    assert!(!result.changed);
    assert!(result.added_regions.is_empty());
}

#[test]
fn test_synthesized_marker_pair_is_indented() {
    let merger = SourceMerger::new(StaticRenderer::new());
    let mut spec = RegionSpec::new("Init");
    spec.indentation_level = 1;
    let result = merger.merge("", &[spec], &RenderContext::new()).unwrap();

    assert_eq!(
        result.merged_text,
        "    // SECTION-START[Init]\n    // SECTION-END\n"
    );
    assert_eq!(result.added_regions, vec!["Init"]);
}

#[test]
fn test_legacy_region_survives_and_is_reported() {
    let merger = SourceMerger::new(StaticRenderer::new());
    let input = "// SECTION-START[Legacy]\nancient();\n// SECTION-END\n\
                 // SECTION-START[Body]\n// SECTION-END\n";
    let result = merger
        .merge(input, &[RegionSpec::new("Body")], &RenderContext::new())
        .unwrap();

    assert!(result
        .merged_text
        .contains("// SECTION-START[Legacy]\nancient();\n// SECTION-END\n"));
    assert_eq!(result.unknown_regions, vec!["Legacy"]);
    assert!(!result.changed);
}

#[test]
fn test_optional_untemplated_region_stays_absent() {
    let merger = SourceMerger::new(StaticRenderer::new());
    let mut optional = RegionSpec::new("Maybe");
    optional.optional = true;
    let result = merger
        .merge("", &[optional, RegionSpec::new("Body")], &RenderContext::new())
        .unwrap();

    assert!(!result.merged_text.contains("Maybe"));
    assert_eq!(result.added_regions, vec!["Body"]);
}

#[test]
fn test_nested_synthesis_under_existing_parent() {
    let merger = SourceMerger::new(StaticRenderer::new());
    let mut outer = RegionSpec::new("Class");
    let mut ctor = RegionSpec::new("Constructor");
    ctor.indentation_level = 1;
    outer.children.push(ctor);

    let input = "// SECTION-START[Class]\nfield;\n// SECTION-END\n";
    let result = merger.merge(input, &[outer], &RenderContext::new()).unwrap();

    assert_eq!(
        result.merged_text,
        concat!(
            "// SECTION-START[Class]\n",
            "field;\n",
            "    // SECTION-START[Constructor]\n",
            "    // SECTION-END\n",
            "// SECTION-END\n",
        )
    );
    assert_eq!(result.added_regions, vec!["Class/Constructor"]);
}

#[test]
fn test_surrounding_text_is_untouched() {
    let merger = SourceMerger::new(StaticRenderer::new());
    let input = "#!/usr/bin/env run\nprelude;\n\
                 // SECTION-START[Body]\n// SECTION-END\n\
                 postlude;\n";
    let result = merger
        .merge(input, &[RegionSpec::new("Body")], &RenderContext::new())
        .unwrap();
    assert_eq!(result.merged_text, input);
    assert!(!result.changed);
}

#[test]
fn test_unbalanced_input_aborts_the_merge() {
    let merger = SourceMerger::new(StaticRenderer::new());
    let err = merger
        .merge(
            "// SECTION-START[Body]\nnever closed\n",
            &[RegionSpec::new("Body")],
            &RenderContext::new(),
        )
        .unwrap_err();
    assert!(matches!(err, MergeError::UnbalancedMarkers { .. }));
}

#[test]
fn test_render_failure_aborts_with_region_context() {
    let merger = SourceMerger::new(StaticRenderer::new());
    let mut spec = RegionSpec::new("Header");
    spec.editable = false;
    spec.head_template = Some("absent-template".to_string());
    let err = merger.merge("", &[spec], &RenderContext::new()).unwrap_err();
    match err {
        MergeError::Render { template, region, .. } => {
            assert_eq!(template, "absent-template");
            assert_eq!(region, "Header");
        }
        other => panic!("expected Render, got {other:?}"),
    }
}

#[test]
fn test_hash_comment_artifact_with_editor_chain() {
    let syntax = MarkerSyntax {
        comment_prefix: "#".to_string(),
        indent_unit: "  ".to_string(),
    };
    let mut merger = SourceMerger::with_syntax(StaticRenderer::new(), syntax);
    merger.add_editor(TrimTrailingWhitespace);

    let input = "# SECTION-START[Setup]\nsetup   \n# SECTION-END\n";
    let result = merger
        .merge(input, &[RegionSpec::new("Setup")], &RenderContext::new())
        .unwrap();
    assert_eq!(result.merged_text, "# SECTION-START[Setup]\nsetup\n# SECTION-END\n");
    assert!(result.changed);
}

#[test]
fn test_spec_tree_loads_from_json() {
    let json = r#"[
        {"name": "License", "optional": true, "editable": false, "head_template": "lic"},
        {"name": "Body"}
    ]"#;
    let specs: Vec<RegionSpec> = serde_json::from_str(json).unwrap();
    let merger = SourceMerger::new(license_renderer());
    let result = merger.merge("", &specs, &RenderContext::new()).unwrap();
    assert!(result.merged_text.contains("/* L */\n"));
    assert_eq!(result.added_regions, vec!["Body"]);
}

#[test]
fn test_context_values_reach_the_renderer() {
    struct EchoRenderer;
    impl genmerge::TemplateRenderer for EchoRenderer {
        fn render(
            &self,
            _template: &str,
            context: &RenderContext,
        ) -> Result<String, genmerge::RenderError> {
            let name = context
                .values
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| genmerge::RenderError::new("missing 'name'"))?;
            Ok(format!("// generated for {}\n", name))
        }
    }

    let mut spec = RegionSpec::new("Header");
    spec.editable = false;
    spec.head_template = Some("header".to_string());
    let mut context = RenderContext::new();
    context.insert("name", "Invoice");

    let merger = SourceMerger::new(EchoRenderer);
    let result = merger.merge("", &[spec], &context).unwrap();
    assert!(result.merged_text.contains("// generated for Invoice\n"));
}
