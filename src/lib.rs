// vidlex: keyword ranking for video transcripts and theme tagging for
// viewer comments
//
// This is the library root. Each module corresponds to a stage of the
// analysis: the corpus store feeds the topic pipeline, and the theme
// classifier works on comment exports independently.

pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod themes;
pub mod topics;
