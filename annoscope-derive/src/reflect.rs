//! `#[derive(Reflect)]` expansion.
//!
//! Locals in the generated `register` body carry mixed-site spans, so the
//! `#[annotate(..)]` expressions expanded next to them resolve names at the
//! user's call site.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Expr, Fields};

use crate::attrs::{annotations, reflect_name, type_label};

fn local(name: &str) -> Ident {
    Ident::new(name, Span::mixed_site())
}

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let catalog = local("catalog");
    let type_id = reflect_name(&input.attrs)?.unwrap_or_else(|| ident.to_string());
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let type_annotations = attach_all(&catalog, &annotations(&input.attrs)?, &type_id);

    let (slot_count, body) = match &input.data {
        Data::Struct(data) => {
            let product = product_decl(&catalog, &type_id, &type_annotations, &data.fields)?;
            (data.fields.len(), product)
        }
        Data::Enum(data) => {
            let mut variant_ids = Vec::with_capacity(data.variants.len());
            let mut variant_decls = Vec::with_capacity(data.variants.len());
            for variant in &data.variants {
                let variant_id = reflect_name(&variant.attrs)?
                    .unwrap_or_else(|| format!("{type_id}::{}", variant.ident));
                let variant_annotations =
                    attach_all(&catalog, &annotations(&variant.attrs)?, &variant_id);
                variant_decls.push(product_decl(
                    &catalog,
                    &variant_id,
                    &variant_annotations,
                    &variant.fields,
                )?);
                variant_ids.push(variant_id);
            }
            let attached = local("annotations");
            let sum = quote! {
                #(#variant_decls)*
                let #attached = #type_annotations;
                #catalog.declare_type(::annoscope::TypeDecl {
                    id: ::std::string::String::from(#type_id),
                    annotations: #attached,
                    shape: ::annoscope::Shape::Sum {
                        variants: ::std::option::Option::Some(::std::vec![
                            #(::std::string::String::from(#variant_ids)),*
                        ]),
                    },
                });
            };
            (data.variants.len(), sum)
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "Reflect cannot be derived for unions: they are neither product- nor sum-shaped",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::annoscope::Reflect for #ident #ty_generics #where_clause {
            const TYPE_ID: &'static str = #type_id;
            const SLOT_COUNT: usize = #slot_count;

            fn register(#catalog: &mut ::annoscope::Catalog) -> ::annoscope::Result<()> {
                #body
                ::std::result::Result::Ok(())
            }
        }
    })
}

/// Statements declaring a product type `id` over `fields`.
fn product_decl(
    catalog: &Ident,
    id: &str,
    annotations_expr: &TokenStream,
    fields: &Fields,
) -> syn::Result<TokenStream> {
    let mut slots = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("reflect")) {
            return Err(syn::Error::new_spanned(
                attr,
                "`#[reflect(..)]` applies to types and enum variants, not fields",
            ));
        }
        let name = field
            .ident
            .as_ref()
            .map_or_else(|| index.to_string(), ToString::to_string);
        let site = format!("{id}.{name}");
        let type_ref = type_label(&field.ty);
        let field_annotations = attach_all(catalog, &annotations(&field.attrs)?, &site);
        slots.push(quote! {
            ::annoscope::SlotDecl {
                name: ::std::string::String::from(#name),
                type_ref: ::std::string::String::from(#type_ref),
                annotations: #field_annotations,
            }
        });
    }
    let attached = local("annotations");
    let declared = local("slots");
    Ok(quote! {
        {
            let #attached = #annotations_expr;
            let #declared = ::std::vec![#(#slots),*];
            #catalog.declare_type(::annoscope::TypeDecl {
                id: ::std::string::String::from(#id),
                annotations: #attached,
                shape: ::annoscope::Shape::Product {
                    slots: #declared,
                    secondary: ::std::vec::Vec::new(),
                },
            });
        }
    })
}

/// A `Vec<Annotation>` expression attaching each instance at `site`.
fn attach_all(catalog: &Ident, exprs: &[Expr], site: &str) -> TokenStream {
    quote! {
        ::std::vec![#(#catalog.attach(&(#exprs), #site)?),*]
    }
}
