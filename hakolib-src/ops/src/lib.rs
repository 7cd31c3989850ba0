use inner::doc_inline_reexport;

doc_inline_reexport! {
    out_of_range,
}
