pub mod chain;

pub use chain::{
    ChainGraph, ChainHighlight, Emphasis, ItemStyling, LinkStroke, chain_curve, item_styling,
    link_stroke, resolve_chain_curves,
};
