use ocgc::{
    compile_graph, compile_graph_with_options, compile_stylesheet, import_graph, CompileOptions,
    CssVariable, Diagnostic, Direction, Graph, NodeId, NodeKind, SlotOrder,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn color(graph: &mut Graph, id: &str, name: &str, value: &str) {
    graph.add_node(
        id,
        NodeKind::InputColor {
            name: name.into(),
            color: value.into(),
        },
    );
}

fn number(graph: &mut Graph, id: &str, name: &str, value: f64) {
    graph.add_node(
        id,
        NodeKind::InputNumber {
            name: name.into(),
            value,
        },
    );
}

fn output(graph: &mut Graph, id: &str, name: &str) {
    graph.add_node(id, NodeKind::Output { name: name.into() });
}

fn value_of<'a>(variables: &'a [CssVariable], name: &str) -> Option<&'a str> {
    variables
        .iter()
        .find(|variable| variable.name == name)
        .map(|variable| variable.value.as_str())
}

#[test]
fn named_number_is_emitted_literally() {
    init_tracing();
    let mut graph = Graph::new();
    number(&mut graph, "n", "x", 5.0);

    let variables = compile_graph(&graph);
    assert_eq!(variables, [CssVariable::new("x", "5")]);
    assert_eq!(variables[0].to_string(), "--x: 5;");
}

#[test]
fn output_fed_by_named_color_references_it() {
    let mut graph = Graph::new();
    color(&mut graph, "c", "base", "oklch(0.7 0.1 30)");
    output(&mut graph, "o", "result");
    graph.connect("c", "o", None);

    let variables = compile_graph(&graph);
    assert_eq!(value_of(&variables, "--base"), Some("oklch(0.7 0.1 30)"));
    assert_eq!(value_of(&variables, "--result"), Some("var(--base)"));
}

#[test]
fn unnamed_inputs_are_inlined() {
    let mut graph = Graph::new();
    number(&mut graph, "three", "", 3.0);
    number(&mut graph, "four", "", 4.0);
    graph.add_node("sum", NodeKind::Add(Direction::Up));
    output(&mut graph, "o", "total");
    graph.connect("four", "sum", Some("input-1"));
    graph.connect("three", "sum", Some("input-0"));
    graph.connect("sum", "o", None);

    let variables = compile_graph(&graph);
    assert_eq!(variables, [CssVariable::new("total", "calc(3 + 4)")]);
}

#[test]
fn empty_color_falls_back_to_default() {
    let mut graph = Graph::new();
    color(&mut graph, "c", "accent", "");
    color(&mut graph, "d", "", "");
    graph.add_node("inv", NodeKind::Invert);
    output(&mut graph, "o", "inverted");
    graph.connect("d", "inv", Some("input-0"));
    graph.connect("inv", "o", None);

    let variables = compile_graph(&graph);
    assert_eq!(value_of(&variables, "--accent"), Some("oklch(0.5 0.2 180)"));
    assert_eq!(
        value_of(&variables, "--inverted"),
        Some("oklch(from oklch(0.5 0.2 180) calc(1 - l) c h)")
    );
}

#[test]
fn downstream_output_reuses_upstream_variable() {
    init_tracing();
    let mut graph = Graph::new();
    color(&mut graph, "base", "base", "oklch(0.4 0.1 250)");
    graph.add_node("rot", NodeKind::Rotate);
    graph.add_node("sat", NodeKind::Saturate(Direction::Up));
    // Declared before the output it builds on.
    output(&mut graph, "out_a", "a");
    output(&mut graph, "out_b", "b");
    graph.connect("base", "rot", Some("input-0"));
    graph.connect("rot", "sat", Some("input-0"));
    graph.connect("sat", "out_a", None);
    graph.connect("rot", "out_b", None);

    let report = compile_graph_with_options(&graph, &CompileOptions::default());
    let names: Vec<_> = report.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["--base", "--b", "--a"]);
    assert_eq!(
        value_of(&report.variables, "--b"),
        Some("oklch(from var(--base) l c calc(h + 30))")
    );
    assert_eq!(
        value_of(&report.variables, "--a"),
        Some("oklch(from var(--b) l calc(c + 0.1) h)")
    );
    assert!(report.diagnostics.is_empty());
}

#[test]
fn binding_reuse_can_be_disabled() {
    let mut graph = Graph::new();
    color(&mut graph, "base", "base", "oklch(0.4 0.1 250)");
    graph.add_node("rot", NodeKind::Rotate);
    graph.add_node("inv", NodeKind::Invert);
    output(&mut graph, "o1", "rotated");
    output(&mut graph, "o2", "inverted");
    graph.connect("base", "rot", Some("input-0"));
    graph.connect("rot", "inv", Some("input-0"));
    graph.connect("rot", "o1", None);
    graph.connect("inv", "o2", None);

    let options = CompileOptions {
        reuse_bindings: false,
        ..CompileOptions::default()
    };
    let report = compile_graph_with_options(&graph, &options);
    assert_eq!(
        value_of(&report.variables, "--inverted"),
        Some("oklch(from oklch(from var(--base) l c calc(h + 30)) calc(1 - l) c h)")
    );
}

#[test]
fn compiling_twice_is_byte_identical() {
    let json = include_str!("fixtures/starter_graph.json");
    let graph = import_graph(json).unwrap();

    let first = compile_stylesheet(&graph);
    let second = compile_stylesheet(&graph);
    assert_eq!(first, second);
}

#[test]
fn starter_graph_compiles_to_a_chain() {
    init_tracing();
    let graph = import_graph(include_str!("fixtures/starter_graph.json")).unwrap();

    let css = compile_stylesheet(&graph);
    assert_eq!(
        css,
        ":root {\n\
         \x20 --base-color: oklch(43.268% 0.12114 249.58);\n\
         \x20 --lighten-amount: 0.15;\n\
         \x20 --step-1: oklch(from var(--base-color) calc(l + var(--lighten-amount)) c h);\n\
         \x20 --step-2: oklch(from var(--step-1) calc(l + var(--lighten-amount)) c h);\n\
         \x20 --step-3: oklch(from var(--step-2) calc(l + var(--lighten-amount)) c h);\n\
         }"
    );
}

#[test]
fn divide_by_zero_is_left_to_css() {
    let mut graph = Graph::new();
    number(&mut graph, "x", "", 8.0);
    number(&mut graph, "zero", "", 0.0);
    graph.add_node("div", NodeKind::Multiply(Direction::Down));
    output(&mut graph, "o", "ratio");
    graph.connect("x", "div", Some("input-0"));
    graph.connect("zero", "div", Some("input-1"));
    graph.connect("div", "o", None);

    assert_eq!(compile_graph(&graph), [CssVariable::new("ratio", "calc(8 / 0)")]);
}

#[test]
fn inert_outputs_emit_nothing_but_are_reported() {
    let mut graph = Graph::new();
    number(&mut graph, "n", "", 1.0);
    output(&mut graph, "unnamed", "");
    output(&mut graph, "loose", "loose");
    output(&mut graph, "dangling", "dangling");
    graph.connect("n", "unnamed", None);
    graph.connect("ghost", "dangling", None);

    let report = compile_graph_with_options(&graph, &CompileOptions::default());
    assert!(report.variables.is_empty());
    assert!(report.diagnostics.contains(&Diagnostic::UnnamedNode {
        node: NodeId::from("n")
    }));
    assert!(report.diagnostics.contains(&Diagnostic::UnnamedNode {
        node: NodeId::from("unnamed")
    }));
    assert!(report.diagnostics.contains(&Diagnostic::DisconnectedOutput {
        node: NodeId::from("loose")
    }));
    assert!(report.diagnostics.contains(&Diagnostic::MissingNode {
        edge: "edge-ghost-dangling-in".into(),
        node: NodeId::from("ghost"),
    }));
}

#[test]
fn dangling_operand_uses_fallback_literal() {
    let mut graph = Graph::new();
    number(&mut graph, "n", "n", 2.0);
    graph.add_node("mul", NodeKind::Multiply(Direction::Up));
    output(&mut graph, "o", "scaled");
    graph.connect("n", "mul", Some("input-0"));
    graph.connect("ghost", "mul", Some("input-1"));
    graph.connect("mul", "o", None);

    let variables = compile_graph(&graph);
    assert_eq!(value_of(&variables, "--scaled"), Some("calc(var(--n) * 1)"));
}

#[test]
fn dangling_first_operand_starts_from_zero() {
    let mut graph = Graph::new();
    number(&mut graph, "n", "n", 3.0);
    graph.add_node("mul", NodeKind::Multiply(Direction::Up));
    graph.add_node("empty", NodeKind::Multiply(Direction::Up));
    output(&mut graph, "o", "scaled");
    output(&mut graph, "e", "unit");
    graph.connect("ghost", "mul", Some("input-0"));
    graph.connect("n", "mul", Some("input-1"));
    graph.connect("mul", "o", None);
    graph.connect("empty", "e", None);

    let variables = compile_graph(&graph);
    assert_eq!(value_of(&variables, "--scaled"), Some("calc(0 * var(--n))"));
    assert_eq!(value_of(&variables, "--unit"), Some("calc(0 * 1)"));
}

#[test]
fn mode_flag_selects_opposite_formula() {
    let graph = import_graph(
        r#"{
            "nodes": [
                { "id": "c", "type": "inputColor", "data": { "name": "c", "color": "oklch(0.8 0.1 90)" } },
                { "id": "l", "type": "lighten", "data": { "isDarken": true } },
                { "id": "s", "type": "saturate", "data": { "isDesaturate": true } },
                { "id": "o", "type": "output", "data": { "name": "muted" } }
            ],
            "edges": [
                { "id": "e1", "source": "c", "target": "l", "targetHandle": "input-0" },
                { "id": "e2", "source": "l", "target": "s", "targetHandle": "input-0" },
                { "id": "e3", "source": "s", "target": "o", "targetHandle": null }
            ]
        }"#,
    )
    .unwrap();

    let variables = compile_graph(&graph);
    assert_eq!(
        value_of(&variables, "--muted"),
        Some("oklch(from oklch(from var(--c) calc(l - 0.1) c h) l calc(c - 0.1) h)")
    );
}

#[test]
fn slots_follow_handle_text_order() {
    let mut graph = Graph::new();
    number(&mut graph, "two", "two", 2.0);
    number(&mut graph, "ten", "ten", 10.0);
    graph.add_node("sub", NodeKind::Add(Direction::Down));
    output(&mut graph, "o", "diff");
    graph.connect("two", "sub", Some("input-2"));
    graph.connect("ten", "sub", Some("input-10"));
    graph.connect("sub", "o", None);

    let variables = compile_graph(&graph);
    assert_eq!(value_of(&variables, "--diff"), Some("calc(var(--ten) - var(--two))"));

    let options = CompileOptions {
        slot_order: SlotOrder::Numeric,
        ..CompileOptions::default()
    };
    let report = compile_graph_with_options(&graph, &options);
    assert_eq!(
        value_of(&report.variables, "--diff"),
        Some("calc(var(--two) - var(--ten))")
    );
}

#[test]
fn lone_second_slot_becomes_first_operand() {
    let mut graph = Graph::new();
    number(&mut graph, "amt", "amt", 0.2);
    graph.add_node("l", NodeKind::Lighten(Direction::Up));
    output(&mut graph, "o", "lit");
    graph.connect("amt", "l", Some("input-1"));
    graph.connect("l", "o", None);

    let variables = compile_graph(&graph);
    assert_eq!(
        value_of(&variables, "--lit"),
        Some("oklch(from var(--amt) calc(l + 0.1) c h)")
    );
}

#[test]
fn names_can_be_normalized() {
    let mut graph = Graph::new();
    color(&mut graph, "c", "Brand Primary", "oklch(0.6 0.2 20)");
    graph.add_node("comp", NodeKind::Complementary);
    output(&mut graph, "o", "Brand_Opposite");
    graph.connect("c", "comp", Some("input-0"));
    graph.connect("comp", "o", None);

    let options = CompileOptions {
        normalize_names: true,
        ..CompileOptions::default()
    };
    let report = compile_graph_with_options(&graph, &options);
    assert_eq!(
        report.variables,
        [
            CssVariable::new("brand-primary", "oklch(0.6 0.2 20)"),
            CssVariable::new(
                "brand-opposite",
                "oklch(from var(--brand-primary) l c calc(h + 180))"
            ),
        ]
    );
}

#[test]
fn cyclic_graph_terminates_with_diagnostics() {
    init_tracing();
    let mut graph = Graph::new();
    graph.add_node("p1", NodeKind::Invert);
    graph.add_node("p2", NodeKind::Complementary);
    output(&mut graph, "o1", "one");
    output(&mut graph, "o2", "two");
    graph.connect("p2", "p1", Some("input-0"));
    graph.connect("p1", "p2", Some("input-0"));
    graph.connect("p1", "o1", None);
    graph.connect("p2", "o2", None);

    let report = compile_graph_with_options(&graph, &CompileOptions::default());
    assert_eq!(report.variables.len(), 2);
    assert!(report.diagnostics.contains(&Diagnostic::CyclicOutputs {
        outputs: vec![NodeId::from("o1"), NodeId::from("o2")],
    }));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::CyclicInput { .. })));
}

#[test]
fn empty_graph_renders_placeholder_block() {
    assert_eq!(
        compile_stylesheet(&Graph::new()),
        ":root {\n  /* Add nodes to generate CSS variables */\n}"
    );
}

#[test]
fn custom_selector_is_used() {
    let mut graph = Graph::new();
    number(&mut graph, "n", "gap", 4.0);

    let options = CompileOptions::from_json(r#"{ "selector": ".theme-dark" }"#).unwrap();
    assert_eq!(
        ocgc::compile_stylesheet_with_options(&graph, &options),
        ".theme-dark {\n  --gap: 4;\n}"
    );
}
