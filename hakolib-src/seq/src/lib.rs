use inner::{doc_inline_reexport, doc_module_reexport};

doc_inline_reexport! {
    fixed_array,
    queue,
    stack,
}

// both name their owning iterator IntoIter
doc_module_reexport! {
    dyn_array,
    linked_list,
}
