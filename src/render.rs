//! Projection of the graph into Slint models.
//!
//! [`CanvasView`] owns one `VecModel` for nodes and one for connections. After
//! every mutation the canvas calls [`CanvasView::sync`], which recomputes the
//! screen-space rows from the model and updates the Slint models in place
//! (changed rows are replaced, new rows pushed, excess rows removed). Nothing
//! is ever read back from these models into the graph.
//!
//! A window declares its own row structs, so the application binds models of
//! its generated types with a constructor that converts each row. Bound models
//! are kept in sync together with the built-in ones.
//!
//! # Example
//!
//! ```ignore
//! let mut canvas = GraphCanvas::open(config, store)?;
//! let nodes = Rc::new(VecModel::<NodeData>::default());
//! canvas.bind_nodes(nodes.clone(), |row: &NodeView| NodeData {
//!     id: row.id.clone(),
//!     text: row.text.clone(),
//!     x: row.x,
//!     y: row.y,
//!     selected: row.selected,
//!     ..Default::default()
//! });
//! window.set_nodes(ModelRc::from(nodes));
//! ```

use crate::graph::{GraphDocument, NodeId};
use crate::state::GeometryCache;
use slint::{Model, ModelRc, SharedString, VecModel};
use std::fmt::Write;
use std::rc::Rc;

const CONNECTION_STROKE: &str = "#4a90d9";
const CONNECTION_WIDTH: f32 = 2.0;

/// Screen-space row for one node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeView {
    pub id: SharedString,
    pub text: SharedString,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub is_root: bool,
    pub selected: bool,
    /// Source of a pending connection.
    pub connect_source: bool,
    pub editing: bool,
}

/// Screen-space row for one connection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionView {
    pub id: SharedString,
    pub from: SharedString,
    pub to: SharedString,
    /// SVG path commands.
    pub path: SharedString,
}

/// View-only state that affects how nodes are drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlights<'a> {
    pub selected: Option<&'a NodeId>,
    pub connect_source: Option<&'a NodeId>,
    pub editing: Option<&'a NodeId>,
}

/// Pushes rows into an application-owned model.
trait ModelSyncer<R> {
    fn sync(&self, rows: &[R]);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<R, P, F> ModelSyncer<R> for ConcreteModelSyncer<P, F>
where
    P: Clone + PartialEq + 'static,
    F: Fn(&R) -> P,
{
    fn sync(&self, rows: &[R]) {
        sync_rows(&self.model, rows.iter().map(&self.constructor));
    }
}

/// Slint models mirroring the graph.
pub struct CanvasView {
    nodes: Rc<VecModel<NodeView>>,
    connections: Rc<VecModel<ConnectionView>>,
    node_syncers: Vec<Box<dyn ModelSyncer<NodeView>>>,
    connection_syncers: Vec<Box<dyn ModelSyncer<ConnectionView>>>,
    width: f64,
    height: f64,
}

impl CanvasView {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            nodes: Rc::new(VecModel::default()),
            connections: Rc::new(VecModel::default()),
            node_syncers: Vec::new(),
            connection_syncers: Vec::new(),
            width,
            height,
        }
    }

    pub fn nodes_model(&self) -> ModelRc<NodeView> {
        ModelRc::from(self.nodes.clone())
    }

    pub fn connections_model(&self) -> ModelRc<ConnectionView> {
        ModelRc::from(self.connections.clone())
    }

    /// Keep `model` in sync with the node rows, converting each through
    /// `constructor`. The model is filled immediately.
    pub fn bind_nodes<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + PartialEq + 'static,
        F: Fn(&NodeView) -> P + 'static,
    {
        let syncer = ConcreteModelSyncer { model, constructor };
        syncer.sync(&self.node_rows());
        self.node_syncers.push(Box::new(syncer));
    }

    /// Keep `model` in sync with the connection rows.
    pub fn bind_connections<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + PartialEq + 'static,
        F: Fn(&ConnectionView) -> P + 'static,
    {
        let syncer = ConcreteModelSyncer { model, constructor };
        syncer.sync(&self.connection_rows());
        self.connection_syncers.push(Box::new(syncer));
    }

    pub fn node_rows(&self) -> Vec<NodeView> {
        self.nodes.iter().collect()
    }

    pub fn connection_rows(&self) -> Vec<ConnectionView> {
        self.connections.iter().collect()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Recompute every row from the graph.
    pub fn sync(&self, doc: &GraphDocument, cache: &GeometryCache, highlights: Highlights<'_>) {
        let view = *doc.view();

        let node_rows = doc.node_rects(cache).map(|rect| {
            let node = doc.node(&rect.id);
            let (sx, sy) = view.canvas_to_screen(rect.x, rect.y);
            NodeView {
                id: rect.id.as_str().into(),
                text: node.map(|n| n.text()).unwrap_or_default().into(),
                x: sx as f32,
                y: sy as f32,
                width: (rect.width * view.scale) as f32,
                height: (rect.height * view.scale) as f32,
                is_root: node.is_some_and(|n| n.is_root()),
                selected: highlights.selected == Some(&rect.id),
                connect_source: highlights.connect_source == Some(&rect.id),
                editing: highlights.editing == Some(&rect.id),
            }
        });
        sync_rows(&self.nodes, node_rows);
        if !self.node_syncers.is_empty() {
            let rows = self.node_rows();
            for syncer in &self.node_syncers {
                syncer.sync(&rows);
            }
        }

        let connection_rows = doc.connections().iter().map(|c| {
            let screen = c.curve().map_points(|x, y| view.canvas_to_screen(x, y));
            ConnectionView {
                id: c.id().as_str().into(),
                from: c.from().as_str().into(),
                to: c.to().as_str().into(),
                path: screen.to_svg_path().into(),
            }
        });
        sync_rows(&self.connections, connection_rows);
        if !self.connection_syncers.is_empty() {
            let rows = self.connection_rows();
            for syncer in &self.connection_syncers {
                syncer.sync(&rows);
            }
        }
    }

    /// Serialized markup of the connection overlay.
    pub fn overlay_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="connections-layer" width="{}" height="{}">"#,
            self.width, self.height
        );
        for row in self.connections.iter() {
            let _ = write!(
                svg,
                r#"<path id="{}" d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                escape_attr(&row.id),
                escape_attr(&row.path),
                CONNECTION_STROKE,
                CONNECTION_WIDTH
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

/// Update `model` in place so it holds exactly `rows`.
fn sync_rows<T, I>(model: &VecModel<T>, rows: I)
where
    T: Clone + PartialEq + 'static,
    I: Iterator<Item = T>,
{
    let mut count = 0;
    for (i, row) in rows.enumerate() {
        if i < model.row_count() {
            if model.row_data(i).as_ref() != Some(&row) {
                model.set_row_data(i, row);
            }
        } else {
            model.push(row);
        }
        count = i + 1;
    }
    while model.row_count() > count {
        model.remove(model.row_count() - 1);
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ViewTransform;

    fn graph() -> (GraphDocument, GeometryCache, NodeId, NodeId) {
        let cache = GeometryCache::new(100.0, 40.0);
        let mut doc = GraphDocument::with_root(0.0, 0.0, "Central Idea");
        let root = doc.root().unwrap().id().clone();
        let child = doc.add_node(200.0, 0.0, "Idea 1");
        doc.connect(&root, &child, &cache).unwrap();
        (doc, cache, root, child)
    }

    #[test]
    fn test_sync_populates_models() {
        let (doc, cache, root, _) = graph();
        let view = CanvasView::new(800.0, 600.0);
        view.sync(&doc, &cache, Highlights { selected: Some(&root), ..Default::default() });

        let nodes = view.node_rows();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text.as_str(), "Central Idea");
        assert!(nodes[0].is_root);
        assert!(nodes[0].selected);
        assert!(!nodes[1].selected);

        let connections = view.connection_rows();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].path.as_str(), "M 50 20 Q 150 20 250 20");
    }

    #[test]
    fn test_sync_applies_view_transform() {
        let (mut doc, cache, _, _) = graph();
        *doc.view_mut() = ViewTransform::new(2.0, 10.0, 20.0);
        let view = CanvasView::new(800.0, 600.0);
        view.sync(&doc, &cache, Highlights::default());

        let child = &view.node_rows()[1];
        assert_eq!((child.x, child.y), (410.0, 20.0));
        assert_eq!((child.width, child.height), (200.0, 80.0));
        assert_eq!(
            view.connection_rows()[0].path.as_str(),
            "M 110 60 Q 310 60 510 60"
        );
    }

    #[test]
    fn test_sync_removes_stale_rows() {
        let (mut doc, cache, _, child) = graph();
        let view = CanvasView::new(800.0, 600.0);
        view.sync(&doc, &cache, Highlights::default());

        doc.remove_node(&child).unwrap();
        view.sync(&doc, &cache, Highlights::default());
        assert_eq!(view.node_rows().len(), 1);
        assert!(view.connection_rows().is_empty());
        assert_eq!(view.nodes_model().row_count(), 1);
    }

    #[test]
    fn test_overlay_svg_contains_paths() {
        let (doc, cache, _, _) = graph();
        let view = CanvasView::new(800.0, 600.0);
        view.sync(&doc, &cache, Highlights::default());

        let svg = view.overlay_svg();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="800" height="600""#));
        assert!(svg.contains(r#"<path id="conn_1" d="M 50 20 Q 150 20 250 20""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct NodeData {
        id: SharedString,
        label: SharedString,
        highlighted: bool,
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct LinkData {
        path: SharedString,
    }

    #[test]
    fn test_bound_models_follow_sync() {
        let (mut doc, cache, root, child) = graph();
        let mut view = CanvasView::new(800.0, 600.0);
        view.sync(&doc, &cache, Highlights::default());

        let nodes = Rc::new(VecModel::<NodeData>::default());
        view.bind_nodes(nodes.clone(), |row| NodeData {
            id: row.id.clone(),
            label: row.text.clone(),
            highlighted: row.selected,
        });
        let links = Rc::new(VecModel::<LinkData>::default());
        view.bind_connections(links.clone(), |row| LinkData {
            path: row.path.clone(),
        });
        assert_eq!(nodes.row_count(), 2);
        assert_eq!(links.row_count(), 1);

        doc.set_text(&root, "Plan").unwrap();
        doc.remove_node(&child).unwrap();
        view.sync(&doc, &cache, Highlights { selected: Some(&root), ..Default::default() });

        assert_eq!(nodes.row_count(), 1);
        assert_eq!(
            nodes.row_data(0),
            Some(NodeData {
                id: root.as_str().into(),
                label: "Plan".into(),
                highlighted: true,
            })
        );
        assert_eq!(links.row_count(), 0);
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
