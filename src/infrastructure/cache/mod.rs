pub mod in_memory_page_cache;
