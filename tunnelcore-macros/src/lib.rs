//! Attribute macros shared by the `tunnelcore` crate.
//!
//! Both macros expand to paths under `crate::`, so they are only meant to be
//! used from inside `tunnelcore` itself.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, ImplItem, ItemImpl, Stmt, Variant,
    Visibility,
};

/// Turns an enum into a `tunnelcore` error type.
///
/// The expansion:
/// 1. derives `Debug`, `thiserror::Error` and `uniffi::Error` with `#[uniffi(flat_error)]`
///    (any `derive`/`uniffi` attribute already on the enum is dropped),
/// 2. appends a `Generic { message: String }` variant unless one exists,
/// 3. implements `From<anyhow::Error>`, flattening the context chain into `message`.
///
/// ```rust,ignore
/// #[tunnelcore_error]
/// pub enum StoreError {
///     #[error("store is locked")]
///     Locked,
/// }
/// ```
#[proc_macro_attribute]
pub fn tunnelcore_error(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    if !matches!(input.data, Data::Enum(_)) {
        return syn::Error::new_spanned(
            &input.ident,
            "tunnelcore_error can only be applied to enums",
        )
        .to_compile_error()
        .into();
    }

    if let Data::Enum(data) = &mut input.data {
        if !data.variants.iter().any(|variant| variant.ident == "Generic") {
            data.variants.push(generic_variant());
        }
    }
    input.attrs.retain(|attr| !is_replaced_attribute(attr));

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        #[derive(Debug, thiserror::Error, uniffi::Error)]
        #[uniffi(flat_error)]
        #input

        impl #impl_generics ::core::convert::From<anyhow::Error> for #name #ty_generics #where_clause {
            fn from(err: anyhow::Error) -> Self {
                use crate::error::ErrorChainExt;
                Self::Generic {
                    message: err.flatten_chain(),
                }
            }
        }
    }
    .into()
}

/// Wraps `#[uniffi::export]` and opens a logging context named after the exported type.
///
/// Every `pub fn` in the impl block starts with
/// `let _tunnelcore_log_ctx = crate::primitives::logger::LogContext::new("Type");`
/// so messages logged through the crate's logging macros are prefixed with `[Type]`.
/// Arguments are forwarded to `uniffi::export` untouched.
#[proc_macro_attribute]
pub fn tunnelcore_export(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item = parse_macro_input!(input as ItemImpl);
    inject_log_context(&mut item);

    let args = proc_macro2::TokenStream::from(args);
    quote! {
        #[uniffi::export(#args)]
        #item
    }
    .into()
}

fn generic_variant() -> Variant {
    syn::parse_quote! {
        /// Failure without a dedicated variant, carrying its flattened context chain.
        #[error("{message}")]
        Generic {
            /// The flattened error chain.
            message: String
        }
    }
}

fn is_replaced_attribute(attr: &Attribute) -> bool {
    attr.path().is_ident("derive") || attr.path().is_ident("uniffi")
}

/// Last path segment of the implementing type, e.g. `ProfileUpgrader`.
fn impl_type_name(item: &ItemImpl) -> String {
    match &*item.self_ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or_else(|| "Unknown".to_string(), |segment| segment.ident.to_string()),
        _ => "Unknown".to_string(),
    }
}

/// Inserts the logging context statement into every public method.
/// Returns how many methods were touched.
fn inject_log_context(item: &mut ItemImpl) -> usize {
    let type_name = impl_type_name(item);
    let statement: Stmt = syn::parse_quote! {
        let _tunnelcore_log_ctx = crate::primitives::logger::LogContext::new(#type_name);
    };

    let mut injected = 0;
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            if matches!(method.vis, Visibility::Public(_)) {
                method.block.stmts.insert(0, statement.clone());
                injected += 1;
            }
        }
    }
    injected
}
