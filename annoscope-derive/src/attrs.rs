//! Helper attribute parsing.

use quote::ToTokens;
use syn::{Attribute, Expr, LitStr, Path, Type};

/// Every `#[annotate(expr)]` on a declaration, in order.
pub(crate) fn annotations(attrs: &[Attribute]) -> syn::Result<Vec<Expr>> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("annotate"))
        .map(|attr| attr.parse_args::<Expr>())
        .collect()
}

/// The `name` of a `#[reflect(name = "..")]`, if present.
pub(crate) fn reflect_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported reflect attribute, expected `name = \"..\"`"))
            }
        })?;
    }
    Ok(name)
}

/// Parsed `#[kind(..)]` options.
#[derive(Default)]
pub(crate) struct KindAttrs {
    pub(crate) name: Option<String>,
    pub(crate) extends: Vec<Path>,
    pub(crate) is_abstract: bool,
}

impl KindAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = KindAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("kind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    parsed.name = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("abstract") {
                    parsed.is_abstract = true;
                    Ok(())
                } else if meta.path.is_ident("extends") {
                    meta.parse_nested_meta(|parent| {
                        parsed.extends.push(parent.path);
                        Ok(())
                    })
                } else {
                    Err(meta.error(
                        "unsupported kind attribute, expected `name`, `extends(..)` or `abstract`",
                    ))
                }
            })?;
        }
        Ok(parsed)
    }
}

/// Renders a type in rustfmt style: `Vec < u8 >` becomes `Vec<u8>`, while
/// `->`, `+` and the separators `,` and `;` keep their surrounding spaces
/// (`dyn Fn(u8) -> u8`, `[u8; 4]`, `(u8, String)`).
pub(crate) fn type_label(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let chars: Vec<char> = raw.chars().collect();
    let word = |c: char| c.is_alphanumeric() || c == '_';
    let mut out = String::with_capacity(raw.len());
    for (i, &c) in chars.iter().enumerate() {
        if c != ' ' {
            out.push(c);
            continue;
        }
        let mut tail = out.chars().rev();
        let (Some(prev), before) = (tail.next(), tail.next()) else {
            continue;
        };
        let Some(&next) = chars.get(i + 1) else {
            continue;
        };
        let keep = (word(prev) && (word(next) || next == '\''))
            || matches!(prev, ',' | ';' | '+')
            || next == '+'
            || (next == '-' && chars.get(i + 2) == Some(&'>'))
            || (prev == '>' && before == Some('-'));
        if keep {
            out.push(' ');
        }
    }
    out
}
