//! 宏之间共用的派生合并与字段补齐

use quote::format_ident;
use syn::punctuated::Punctuated;
use syn::{Attribute, Field, FieldsNamed, Path, Token, Type};

fn same_derive(a: &Path, b: &Path) -> bool {
    // `Serialize` 与 `serde::Serialize` 视为同一个派生
    match (a.segments.last(), b.segments.last()) {
        (Some(x), Some(y)) => x.ident == y.ident,
        _ => false,
    }
}

/// 把 `required` 与用户已写的 `#[derive]` 合并成一个 derive 属性，置于属性最前。
/// `required` 在前，用户额外的派生按原顺序追加，重复项只保留一次。
pub(crate) fn merge_derives(attrs: &mut Vec<Attribute>, required: &[Path]) -> syn::Result<()> {
    let mut derives: Vec<Path> = required.to_vec();
    let mut others = Vec::with_capacity(attrs.len());

    for attr in std::mem::take(attrs) {
        if !attr.path().is_ident("derive") {
            others.push(attr);
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if !derives.iter().any(|d| same_derive(d, &meta.path)) {
                derives.push(meta.path);
            }
            Ok(())
        })?;
    }

    attrs.push(syn::parse_quote!(#[derive(#(#derives),*)]));
    attrs.extend(others);
    Ok(())
}

/// 确保具名字段中包含 `leading` 所列字段，并按给定顺序置于最前。
/// 用户已声明的同名字段原样保留（含属性与可见性）。
pub(crate) fn ensure_leading_fields(fields: &mut FieldsNamed, leading: &[(&str, &Type)]) {
    let is_named = |f: &Field, name: &str| f.ident.as_ref().is_some_and(|i| i == name);

    let mut rest = std::mem::take(&mut fields.named);
    let mut named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in leading {
        if rest.iter().any(|f| is_named(f, name)) {
            let (found, remaining): (Vec<Field>, Vec<Field>) =
                rest.into_iter().partition(|f| is_named(f, name));
            named.extend(found);
            rest = remaining.into_iter().collect();
        } else {
            let ident = format_ident!("{}", name);
            named.push(syn::parse_quote! { #ident: #ty });
        }
    }

    named.extend(rest);
    fields.named = named;
}
