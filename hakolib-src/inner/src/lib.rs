#[macro_export]
macro_rules! doc_inline_reexport {
    ( $($lib:ident,)* ) => { $(
        #[doc(inline)]
        pub use $lib::{self, *};
    )* };
}

// for members whose item names would collide under a glob
#[macro_export]
macro_rules! doc_module_reexport {
    ( $($lib:ident,)* ) => { $(
        #[doc(inline)]
        pub use $lib;
    )* };
}
