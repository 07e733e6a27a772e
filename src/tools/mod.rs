pub mod node_pool;
