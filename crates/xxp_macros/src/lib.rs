use syn::DeriveInput;

mod record;

/// Derives `Shaped`, `IntoValue`, `FromValue` and `Record` for a struct.
///
/// Fields are encoded in declaration order, without any separators.
/// Every field type must implement `IntoValue` and `FromValue` itself.
/// Tuple struct fields are named after their position.
///
/// ```ignore
/// #[derive(Record)]
/// struct User {
///     id: u32,
///     name: String,
///     friends: Vec<u32>,
/// }
///
/// #[derive(Record)]
/// struct Point(i32, i32);
/// ```
#[proc_macro_derive(Record)]
pub fn derive_record(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(item as DeriveInput);

    record::derive(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
