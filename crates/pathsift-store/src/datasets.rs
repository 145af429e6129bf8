//! Canonical toy graphs used by tests and demos.

use crate::PropertyGraph;
use anyhow::Result;
use pathsift_core::Value;
use tracing::debug;

/// The six-vertex "modern" graph.
///
/// Vertex ids 1-6, edge ids 7-12:
///
/// ```text
/// marko(1) -knows(7, 0.5)->   vadas(2)
/// marko(1) -knows(8, 1.0)->   josh(4)
/// marko(1) -created(9, 0.4)-> lop(3)
/// josh(4)  -created(10, 1.0)-> ripple(5)
/// josh(4)  -created(11, 0.4)-> lop(3)
/// peter(6) -created(12, 0.2)-> lop(3)
/// ```
pub fn modern() -> Result<PropertyGraph> {
    let mut g = PropertyGraph::new();

    let person = |name: &str, age: i64| vec![("name", Value::from(name)), ("age", Value::Int(age))];
    let software = |name: &str| vec![("name", Value::from(name)), ("lang", Value::from("java"))];

    let marko = g.add_vertex("person", person("marko", 29));
    let vadas = g.add_vertex("person", person("vadas", 27));
    let lop = g.add_vertex("software", software("lop"));
    let josh = g.add_vertex("person", person("josh", 32));
    let ripple = g.add_vertex("software", software("ripple"));
    let peter = g.add_vertex("person", person("peter", 35));

    let weight = |w: f64| vec![("weight", Value::Float(w))];
    g.add_edge("knows", marko, vadas, weight(0.5))?;
    g.add_edge("knows", marko, josh, weight(1.0))?;
    g.add_edge("created", marko, lop, weight(0.4))?;
    g.add_edge("created", josh, ripple, weight(1.0))?;
    g.add_edge("created", josh, lop, weight(0.4))?;
    g.add_edge("created", peter, lop, weight(0.2))?;

    debug!(
        vertices = g.vertex_count(),
        edges = g.edge_count(),
        "loaded modern graph"
    );
    Ok(g)
}

/// The "crew" graph: four people with multi-valued `location` properties,
/// two software projects, and `develops` / `uses` / `traverses` edges.
pub fn crew() -> Result<PropertyGraph> {
    let mut g = PropertyGraph::new();

    let person = |name: &str, locations: &[&str]| {
        let mut props = vec![("name", Value::from(name))];
        props.extend(locations.iter().map(|l| ("location", Value::from(*l))));
        props
    };

    let marko = g.add_vertex(
        "person",
        person("marko", &["san diego", "santa cruz", "brussels", "santa fe"]),
    );
    let stephen = g.add_vertex(
        "person",
        person("stephen", &["centreville", "dulles", "purcellville"]),
    );
    let matthias = g.add_vertex(
        "person",
        person("matthias", &["bremen", "baltimore", "oakland", "seattle"]),
    );
    let daniel = g.add_vertex(
        "person",
        person("daniel", &["spremberg", "kaiserslautern", "aachen"]),
    );
    let gremlin = g.add_vertex("software", vec![("name", Value::from("gremlin"))]);
    let tinkergraph = g.add_vertex("software", vec![("name", Value::from("tinkergraph"))]);

    let since = |year: i64| vec![("since", Value::Int(year))];
    let skill = |level: i64| vec![("skill", Value::Int(level))];

    g.add_edge("develops", marko, gremlin, since(2009))?;
    g.add_edge("develops", marko, tinkergraph, since(2010))?;
    g.add_edge("uses", marko, gremlin, skill(4))?;
    g.add_edge("uses", marko, tinkergraph, skill(5))?;

    g.add_edge("develops", stephen, gremlin, since(2010))?;
    g.add_edge("develops", stephen, tinkergraph, since(2011))?;
    g.add_edge("uses", stephen, gremlin, skill(5))?;
    g.add_edge("uses", stephen, tinkergraph, skill(4))?;

    g.add_edge("develops", matthias, gremlin, since(2012))?;
    g.add_edge("uses", matthias, gremlin, skill(3))?;
    g.add_edge("uses", matthias, tinkergraph, skill(3))?;

    g.add_edge("uses", daniel, gremlin, skill(5))?;
    g.add_edge("uses", daniel, tinkergraph, skill(3))?;

    g.add_edge("traverses", gremlin, tinkergraph, Vec::new())?;

    debug!(
        vertices = g.vertex_count(),
        edges = g.edge_count(),
        "loaded crew graph"
    );
    Ok(g)
}
