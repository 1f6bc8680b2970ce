pub mod authors;
pub mod books;
pub mod publishers;

use std::sync::Arc;

use catalog_db::DocumentStore;
use catalog_kernel::ModuleRegistry;

/// Register all catalog modules with the registry, sharing one store handle
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn DocumentStore>) {
    registry.register(publishers::create_module(Arc::clone(&store)));
    registry.register(authors::create_module(Arc::clone(&store)));
    registry.register(books::create_module(store));
}
