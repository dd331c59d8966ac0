use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::event::{ChainLink, LinkType};
use crate::render::{Color, CurvePath, CurvePrimitive, StrokeStyle};

/// Cross-reference graph over micro-track items.
///
/// Links are directed for rendering (arrowheads) but reachability treats
/// them as undirected: a hover highlights the whole communication thread,
/// upstream and downstream. The graph may contain cycles.
#[derive(Debug, Clone, Default)]
pub struct ChainGraph {
    links: Vec<ChainLink>,
    adjacency: HashMap<String, Vec<usize>>,
}

impl ChainGraph {
    #[must_use]
    pub fn new(links: Vec<ChainLink>) -> Self {
        let mut adjacency: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, link) in links.iter().enumerate() {
            adjacency.entry(link.from_id.clone()).or_default().push(index);
            adjacency.entry(link.to_id.clone()).or_default().push(index);
        }
        Self { links, adjacency }
    }

    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Connected component containing both endpoints of a hovered link.
    ///
    /// Iterative traversal with an explicit queue and visited set, so cyclic
    /// link graphs terminate and stack depth stays bounded.
    #[must_use]
    pub fn component(&self, from_id: &str, to_id: &str) -> ChainHighlight {
        let mut nodes: HashSet<String> = HashSet::new();
        let mut link_indices: HashSet<usize> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        queue.push_back(from_id);
        queue.push_back(to_id);

        while let Some(current) = queue.pop_front() {
            if !nodes.insert(current.to_owned()) {
                continue;
            }
            let Some(incident) = self.adjacency.get(current) else {
                continue;
            };
            for &index in incident {
                link_indices.insert(index);
                let link = &self.links[index];
                let other = if link.from_id == current {
                    link.to_id.as_str()
                } else {
                    link.from_id.as_str()
                };
                if !nodes.contains(other) {
                    queue.push_back(other);
                }
            }
        }

        ChainHighlight {
            nodes,
            link_indices,
        }
    }
}

/// Result of a hover traversal: the component's items and links.
///
/// Everything in the sets is emphasized; everything else dims. Dropping the
/// highlight (hover end) restores default styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHighlight {
    nodes: HashSet<String>,
    link_indices: HashSet<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Emphasized,
    Dimmed,
}

impl ChainHighlight {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        self.link_indices.len()
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    #[must_use]
    pub fn link_emphasis(&self, link_index: usize) -> Emphasis {
        if self.link_indices.contains(&link_index) {
            Emphasis::Emphasized
        } else {
            Emphasis::Dimmed
        }
    }

    #[must_use]
    pub fn item_emphasis(&self, id: &str) -> Emphasis {
        if self.nodes.contains(id) {
            Emphasis::Emphasized
        } else {
            Emphasis::Dimmed
        }
    }
}

/// Stroke attributes for one rendered chain link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStroke {
    pub color: Color,
    pub width: f64,
    pub style: StrokeStyle,
}

/// Default, emphasized, and dimmed stroke styling per link type.
#[must_use]
pub fn link_stroke(link_type: LinkType, emphasis: Option<Emphasis>) -> LinkStroke {
    let (base, dark, dash) = match link_type {
        LinkType::Reply => (
            Color::from_rgb8(0x9b, 0x59, 0xb6),
            Color::from_rgb8(0x8e, 0x44, 0xad),
            StrokeStyle::Dashed {
                on_px: 3.0,
                off_px: 3.0,
            },
        ),
        LinkType::Follows => (
            Color::from_rgb8(0x95, 0xa5, 0xa6),
            Color::from_rgb8(0x2c, 0x3e, 0x50),
            StrokeStyle::Dashed {
                on_px: 4.0,
                off_px: 2.0,
            },
        ),
    };

    match emphasis {
        None => LinkStroke {
            color: base.with_alpha(0.4),
            width: 1.0,
            style: dash,
        },
        Some(Emphasis::Emphasized) => LinkStroke {
            color: dark,
            width: 2.5,
            style: dash,
        },
        Some(Emphasis::Dimmed) => LinkStroke {
            color: base.with_alpha(0.1),
            width: 1.0,
            style: dash,
        },
    }
}

/// Visual adjustments applied to a micro item under a chain highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyling {
    pub scale: f64,
    pub brightness: f64,
    pub opacity: f64,
}

#[must_use]
pub fn item_styling(emphasis: Option<Emphasis>) -> ItemStyling {
    match emphasis {
        None => ItemStyling {
            scale: 1.0,
            brightness: 1.0,
            opacity: 1.0,
        },
        Some(Emphasis::Emphasized) => ItemStyling {
            scale: 1.2,
            brightness: 1.2,
            opacity: 1.0,
        },
        Some(Emphasis::Dimmed) => ItemStyling {
            scale: 1.0,
            brightness: 1.0,
            opacity: 0.3,
        },
    }
}

/// Arched cubic curve between two item centers.
#[must_use]
pub fn chain_curve(from: (f64, f64), to: (f64, f64), stroke: LinkStroke) -> CurvePrimitive {
    let (from_x, from_y) = from;
    let (to_x, to_y) = to;
    let control_y = from_y.min(to_y) - 20.0;

    CurvePrimitive::new(
        CurvePath::Cubic {
            x0: from_x,
            y0: from_y,
            c1x: from_x + (to_x - from_x) * 0.3,
            c1y: control_y,
            c2x: from_x + (to_x - from_x) * 0.7,
            c2y: control_y,
            x1: to_x,
            y1: to_y,
        },
        stroke.width,
        stroke.color,
        stroke.style,
    )
}

/// Resolves every link whose endpoints are currently rendered into a curve.
///
/// Links with a hidden or missing endpoint are skipped with a diagnostic;
/// a dangling reference never fails the render.
#[must_use]
pub fn resolve_chain_curves(
    graph: &ChainGraph,
    centers: &HashMap<String, (f64, f64)>,
    highlight: Option<&ChainHighlight>,
) -> Vec<(usize, CurvePrimitive)> {
    let mut curves = Vec::with_capacity(graph.links().len());
    for (index, link) in graph.links().iter().enumerate() {
        let (Some(&from), Some(&to)) = (centers.get(&link.from_id), centers.get(&link.to_id))
        else {
            tracing::debug!(
                from = %link.from_id,
                to = %link.to_id,
                "chain link endpoint not rendered; link skipped"
            );
            continue;
        };

        let emphasis = highlight.map(|h| h.link_emphasis(index));
        curves.push((index, chain_curve(from, to, link_stroke(link.link_type, emphasis))));
    }
    curves
}
