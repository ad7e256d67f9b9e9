use crate::support::{ensure_leading_fields, merge_derives};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Fields, ItemStruct, LitStr, Path, Type, parse_macro_input, parse_quote};

/// #[entity] 宏实现
/// - 补齐 `id: IdType` 与 `version: VersionToken` 字段并置于最前
/// - 派生 Debug、Clone、Default 与 serde
/// - 实现 `::util_domain::entity::Entity`
///
/// 参数：`#[entity(id = IdType, name = "order")]`，`id` 默认 `String`，`name` 默认结构体名。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut id_ty: Option<Type> = None;
    let mut name: Option<LitStr> = None;
    let args = syn::meta::parser(|meta| {
        if meta.path.is_ident("id") {
            if id_ty.is_some() {
                return Err(meta.error("duplicate `id`"));
            }
            id_ty = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("name") {
            if name.is_some() {
                return Err(meta.error("duplicate `name`"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(syn::Error::new(lit.span(), "`name` must not be empty"));
            }
            name = Some(lit);
            Ok(())
        } else {
            Err(meta.error("expected `id` or `name`"))
        }
    });
    parse_macro_input!(attr with args);

    let mut st = parse_macro_input!(item as ItemStruct);
    match expand_struct(&mut st, id_ty, name) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_struct(
    st: &mut ItemStruct,
    id_ty: Option<Type>,
    name: Option<LitStr>,
) -> syn::Result<proc_macro2::TokenStream> {
    let Fields::Named(fields) = &mut st.fields else {
        return Err(syn::Error::new(st.span(), "#[entity] requires named fields"));
    };

    let id_ty = id_ty.unwrap_or_else(|| parse_quote!(String));
    let version_ty: Type = parse_quote!(::util_domain::value_object::VersionToken);
    ensure_leading_fields(fields, &[("id", &id_ty), ("version", &version_ty)]);

    let derives: [Path; 5] = [
        parse_quote!(Debug),
        parse_quote!(Clone),
        parse_quote!(Default),
        parse_quote!(serde::Serialize),
        parse_quote!(serde::Deserialize),
    ];
    merge_derives(&mut st.attrs, &derives)?;

    let ident = &st.ident;
    let type_name = name.map_or_else(|| ident.to_string(), |lit| lit.value());
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        #st

        impl #impl_generics ::util_domain::entity::Entity for #ident #ty_generics #where_clause {
            const TYPE: &'static str = #type_name;

            type Id = #id_ty;

            fn new(id: Self::Id) -> Self {
                Self { id, ..Default::default() }
            }

            fn id(&self) -> &Self::Id { &self.id }

            fn version(&self) -> &::util_domain::value_object::VersionToken { &self.version }

            fn set_version(&mut self, version: ::util_domain::value_object::VersionToken) {
                self.version = version;
            }
        }
    })
}
