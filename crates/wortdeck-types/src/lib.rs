pub mod types;

pub use types::{
    Example, Facet, FacetState, GenerationRequest, GrammarInfo, MediaRef, NounInfo, VerbInfo,
    WordProfile,
};
