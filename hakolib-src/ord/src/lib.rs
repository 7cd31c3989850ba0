use inner::{doc_inline_reexport, doc_module_reexport};

doc_inline_reexport! {
    rb_tree,
}

// the three container views share iterator type names, so they keep
// their module prefix
doc_module_reexport! {
    ord_map,
    ord_multiset,
    ord_set,
}
