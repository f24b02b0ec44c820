pub mod config;
pub mod crawler;
pub mod export;
pub mod link_graph;
pub mod viewer;
