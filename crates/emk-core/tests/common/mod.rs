pub mod pair_server;
