//! `#[derive(AnnotationKind)]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::attrs::KindAttrs;

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let attrs = KindAttrs::parse(&input.attrs)?;
    let label = ident.to_string();
    let kind_id = attrs.name.unwrap_or_else(|| label.clone());
    let is_abstract = attrs.is_abstract;
    let supers = &attrs.extends;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::annoscope::AnnotationKind for #ident #ty_generics #where_clause {
            const KIND: &'static str = #kind_id;
            const ABSTRACT: bool = #is_abstract;

            fn declaration() -> ::annoscope::KindDecl {
                ::annoscope::KindDecl {
                    id: ::std::string::String::from(#kind_id),
                    label: ::std::string::String::from(#label),
                    is_abstract: #is_abstract,
                    extends: ::std::vec![
                        #(::std::string::String::from(
                            <#supers as ::annoscope::AnnotationKind>::KIND
                        )),*
                    ],
                }
            }

            #[allow(unused_variables)]
            fn register_supers(catalog: &mut ::annoscope::Catalog) {
                #(<#supers as ::annoscope::AnnotationKind>::register(catalog);)*
            }

            fn reaches(target: &str) -> bool {
                target == #kind_id
                    #(|| <#supers as ::annoscope::AnnotationKind>::reaches(target))*
            }

            fn upcast(
                self,
                target: &str,
            ) -> ::std::option::Option<::std::boxed::Box<dyn ::std::any::Any>> {
                if target == #kind_id {
                    return ::std::option::Option::Some(::std::boxed::Box::new(self));
                }
                #(
                    if <#supers as ::annoscope::AnnotationKind>::reaches(target) {
                        return <#supers as ::annoscope::AnnotationKind>::upcast(
                            <#supers as ::std::convert::From<Self>>::from(self),
                            target,
                        );
                    }
                )*
                ::std::option::Option::None
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn default_kind_id_is_the_type_name() {
        let input: DeriveInput = parse_quote! {
            struct Label(String);
        };
        let tokens: String = expand(&input).unwrap().to_string().split_whitespace().collect();
        assert!(tokens.contains("constKIND:&'staticstr=\"Label\""));
        assert!(tokens.contains("constABSTRACT:bool=false"));
    }

    #[test]
    fn supers_are_registered() {
        let input: DeriveInput = parse_quote! {
            #[kind(name = "heading", extends(Label))]
            struct Heading { text: String }
        };
        let tokens: String = expand(&input).unwrap().to_string().split_whitespace().collect();
        assert!(tokens.contains("\"heading\""));
        assert!(tokens.contains("<Labelas::annoscope::AnnotationKind>::register(catalog)"));
        assert!(tokens.contains("<Labelas::std::convert::From<Self>>::from(self)"));
    }
}
