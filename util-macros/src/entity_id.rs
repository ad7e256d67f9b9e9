use crate::support::merge_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Fields, ItemStruct, Path, parse_macro_input, parse_quote};

/// #[entity_id] 宏实现
/// 用于单字段 tuple struct，如 `struct OrderId(Uuid);`：
/// - 派生 Debug、Clone、Default、PartialEq、Eq、Hash 与 serde
/// - 生成 `new`、`Display`、`FromStr` 以及与内部类型的双向 `From`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[entity_id] takes no arguments")
            .to_compile_error()
            .into();
    }
    let mut st = parse_macro_input!(item as ItemStruct);
    match expand_struct(&mut st) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_struct(st: &mut ItemStruct) -> syn::Result<proc_macro2::TokenStream> {
    let inner = match &st.fields {
        Fields::Unnamed(f) if f.unnamed.len() == 1 => f.unnamed[0].ty.clone(),
        other => {
            return Err(syn::Error::new(
                other.span(),
                "#[entity_id] requires a tuple struct with exactly one field",
            ));
        }
    };

    let derives: [Path; 8] = [
        parse_quote!(Debug),
        parse_quote!(Clone),
        parse_quote!(Default),
        parse_quote!(PartialEq),
        parse_quote!(Eq),
        parse_quote!(Hash),
        parse_quote!(serde::Serialize),
        parse_quote!(serde::Deserialize),
    ];
    merge_derives(&mut st.attrs, &derives)?;

    let ident = &st.ident;

    Ok(quote! {
        #st

        impl #ident {
            pub fn new(value: #inner) -> Self { Self(value) }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for #ident {
            type Err = <#inner as ::std::str::FromStr>::Err;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl ::std::convert::From<#inner> for #ident {
            fn from(value: #inner) -> Self { Self(value) }
        }

        impl ::std::convert::From<#ident> for #inner {
            fn from(value: #ident) -> Self { value.0 }
        }
    })
}
