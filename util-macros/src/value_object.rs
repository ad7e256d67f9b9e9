use crate::support::merge_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, Path, parse_macro_input, parse_quote};

/// #[value_object] 宏实现：为结构体合并值语义所需的派生
/// （Debug、Clone、Default、PartialEq、Eq 与 serde）。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[value_object] takes no arguments")
            .to_compile_error()
            .into();
    }
    let mut st = parse_macro_input!(item as ItemStruct);

    let derives: [Path; 7] = [
        parse_quote!(Debug),
        parse_quote!(Clone),
        parse_quote!(Default),
        parse_quote!(PartialEq),
        parse_quote!(Eq),
        parse_quote!(serde::Serialize),
        parse_quote!(serde::Deserialize),
    ];
    if let Err(err) = merge_derives(&mut st.attrs, &derives) {
        return err.to_compile_error().into();
    }
    quote!(#st).into()
}
