use graphviz_rust::{
    dot_structures::{Attribute, Edge, EdgeTy, Graph, Id, Node, NodeId, Stmt, Vertex},
    printer::{DotPrinter, PrinterContext},
};

use crate::automaton::Automaton;

// state names never contain '_', so this cannot clash with a real state
const START_MARKER: &str = "__start";

fn quoted(s: &str) -> Id {
    Id::Escaped(format!("\"{}\"", s))
}

fn plain(s: &str) -> Id {
    Id::Plain(s.to_string())
}

fn state_node(name: &str) -> NodeId {
    NodeId(quoted(name), None)
}

fn edge(from: NodeId, to: NodeId, attributes: Vec<Attribute>) -> Stmt {
    Stmt::Edge(Edge {
        ty: EdgeTy::Pair(Vertex::N(from), Vertex::N(to)),
        attributes,
    })
}

/// Accepting states are drawn as double circles and an unlabelled point marks
/// the way in.
pub fn to_graph(automaton: &Automaton) -> Graph {
    let mut stmts = vec![];
    for (id, name) in automaton.states.iter().enumerate() {
        let shape = if automaton.is_accepting(id) {
            "doublecircle"
        } else {
            "circle"
        };
        stmts.push(Stmt::Node(Node {
            id: state_node(name),
            attributes: vec![Attribute(plain("shape"), plain(shape))],
        }));
    }

    stmts.push(Stmt::Node(Node {
        id: NodeId(plain(START_MARKER), None),
        attributes: vec![Attribute(plain("shape"), plain("point"))],
    }));
    stmts.push(edge(
        NodeId(plain(START_MARKER), None),
        state_node(automaton.state_name(automaton.start)),
        vec![],
    ));

    for t in &automaton.transitions {
        stmts.push(edge(
            state_node(automaton.state_name(t.from)),
            state_node(automaton.state_name(t.to)),
            vec![Attribute(plain("label"), quoted(automaton.symbol_name(t.label)))],
        ));
    }

    Graph::DiGraph {
        id: plain("fsa"),
        strict: false,
        stmts,
    }
}

pub fn to_dot(automaton: &Automaton) -> String {
    to_graph(automaton).print(&mut PrinterContext::default())
}

#[test]
fn test_to_graph() {
    let aut = crate::automaton::build_unchecked([
        "states=[s0,s1]",
        "alpha=[a,b]",
        "initial=[s0]",
        "accepting=[s1]",
        "trans=[s0>a>s1,s1>b>s1]",
    ]);
    let Graph::DiGraph { stmts, .. } = to_graph(&aut) else {
        panic!("expected a directed graph");
    };
    let nodes = stmts
        .iter()
        .filter(|s| matches!(s, Stmt::Node(_)))
        .count();
    let edges = stmts
        .iter()
        .filter(|s| matches!(s, Stmt::Edge(_)))
        .count();
    assert_eq!(nodes, 3);
    assert_eq!(edges, 3);

    let dot = to_dot(&aut);
    assert!(dot.contains("digraph"));
    assert!(dot.contains("fsa"));
    assert!(dot.contains("doublecircle"));
    assert!(dot.contains("\"s0\""));
    assert!(dot.contains("\"b\""));
    assert_eq!(dot.matches("->").count(), 3);
}
