//! Logic for deriving the record traits.
//!
//! The generated code refers to the facade crate through `::xxp`.

use quote::quote;
use syn::{ext::IdentExt, parse_quote, DeriveInput};

/// A struct field, as seen by the generated code
struct RecordField {
    member: syn::Member,
    name: String,
    ty: syn::Type,
}

/// The input tokenstream should contain a struct definition.
pub fn derive(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = input;

    let fields = match data {
        syn::Data::Struct(s) => record_fields(s.fields),
        syn::Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Record can only be derived for structs, enums have no record shape",
            ))
        }
        syn::Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Record can only be derived for structs, unions have no record shape",
            ))
        }
    };

    // every type parameter ends up in a field
    let mut bounded = generics.clone();
    for param in generics.type_params() {
        let param = &param.ident;
        bounded
            .make_where_clause()
            .predicates
            .push(parse_quote!(#param: ::xxp::IntoValue + ::xxp::FromValue));
    }
    let (impl_generics, ty_generics, where_clause) = bounded.split_for_impl();

    let record_name = ident.unraw().to_string();
    let members = fields.iter().map(|f| &f.member).collect::<Vec<_>>();
    let names = fields.iter().map(|f| &f.name).collect::<Vec<_>>();
    let types = fields.iter().map(|f| &f.ty).collect::<Vec<_>>();

    Ok(quote! {
        impl #impl_generics ::xxp::Shaped for #ident #ty_generics #where_clause {
            fn shape() -> ::xxp::Shape {
                ::xxp::Shape::Record(<Self as ::xxp::Record>::record_shape())
            }
        }

        impl #impl_generics ::xxp::IntoValue for #ident #ty_generics #where_clause {
            fn into_value(self) -> ::xxp::Value {
                ::xxp::Value::Record(
                    ::xxp::RecordValue::new(#record_name)
                        #(.with_field(#names, ::xxp::IntoValue::into_value(self.#members)))*
                )
            }
        }

        impl #impl_generics ::xxp::FromValue for #ident #ty_generics #where_clause {
            #[allow(unused_mut)]
            fn from_value(value: ::xxp::Value) -> ::xxp::Result<Self> {
                let mut reader = ::xxp::FieldReader::new(value, #record_name)?;
                let this = Self {
                    #(#members: reader.next(#names)?,)*
                };
                reader.finish()?;

                ::std::result::Result::Ok(this)
            }
        }

        impl #impl_generics ::xxp::Record for #ident #ty_generics #where_clause {
            fn record_shape() -> ::xxp::RecordShape {
                ::xxp::RecordShape::new(#record_name)
                    #(.field(#names, <#types as ::xxp::Shaped>::shape()))*
            }
        }
    })
}

/// Named fields keep their name, tuple fields are named by position
fn record_fields(fields: syn::Fields) -> Vec<RecordField> {
    match fields {
        syn::Fields::Named(named) => named
            .named
            .into_iter()
            .filter_map(|f| {
                let ident = f.ident?;
                Some(RecordField {
                    name: ident.unraw().to_string(),
                    member: syn::Member::Named(ident),
                    ty: f.ty,
                })
            })
            .collect(),

        syn::Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .into_iter()
            .enumerate()
            .map(|(idx, f)| RecordField {
                member: syn::Member::Unnamed(syn::Index::from(idx)),
                name: idx.to_string(),
                ty: f.ty,
            })
            .collect(),

        syn::Fields::Unit => vec![],
    }
}
