pub mod planet_graph;
