pub mod word_map_store;
