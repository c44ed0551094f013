#![allow(unused_imports)]
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat};

/// Wrap an algebra entry point (`meet`, `is_subschema`, `canonicalize`, ...) with
/// structured, opt-in logging.
///
/// Unlike a simple `fn(&mut Value) -> bool` rewrite, the functions in this crate take
/// an arbitrary number of typed arguments and return an owned value (`Schema`, `bool`,
/// `Result<..>`), so the macro captures every argument by its `Debug` representation
/// rather than assuming a single mutable `serde_json::Value` in/out pair.
#[proc_macro_attribute]
pub fn log_call(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    let method_name = sig.ident.to_string();

    let arg_names: Vec<&Ident> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => match &*pat_type.pat {
                Pat::Ident(pat_ident) => Some(&pat_ident.ident),
                _ => None,
            },
            FnArg::Receiver(_) => None,
        })
        .collect();
    let arg_labels: Vec<String> = arg_names.iter().map(|ident| ident.to_string()).collect();

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "logging")]
            let start = std::time::Instant::now();

            let result = #block;

            #[cfg(feature = "logging")]
            log::info!("{}", serde_json::json!({
                "method": #method_name,
                "elapsed_time_s": format!("{:.9}", (std::time::Instant::now() - start).as_secs_f64()),
                "arguments": { #(#arg_labels: format!("{:?}", #arg_names)),* },
                "result": format!("{:?}", result),
            }));

            result
        }
    };

    TokenStream::from(output)
}
