use proc_macro2::{Ident, Span};
use quote::quote;
use std::fmt::Write;
use syn::punctuated::Punctuated;
use syn::{Expr, ExprLit, ItemFn, Lit, MetaNameValue, Token};

/// Escapes a fully-qualified class name or method name the way the JVM does
/// when it looks up a native method symbol.
fn mangle(component: &str) -> String {
    let mut out = String::with_capacity(component.len());

    for c in component.chars() {
        match c {
            '.' | '/' => out.push('_'),
            '_' => out.push_str("_1"),
            ';' => out.push_str("_2"),
            '[' => out.push_str("_3"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(out, "_0{:04x}", unit).unwrap();
                }
            }
        }
    }

    out
}

fn symbol_name(class: &str, method: &str) -> String {
    format!("Java_{}_{}", mangle(class), mangle(method))
}

fn string_arg(arg: &MetaNameValue) -> String {
    match &arg.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => s.value(),
        _ => panic!("jni_export arguments must be string literals"),
    }
}

/// Exports a Rust function as the native implementation of a Java method.
///
/// ```ignore
/// #[jni_export(class = "com.example.MainActivity", name = "stringFromJNI")]
/// fn string_from_jni<'local>(env: JNIEnv<'local>, this: JObject<'local>) -> jstring { .. }
/// ```
///
/// The function itself is left untouched. A `#[no_mangle] extern "system"`
/// wrapper named after the mangled JNI symbol forwards to it.
#[proc_macro_attribute]
pub fn jni_export(
    attr: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let args = syn::parse_macro_input!(
        attr with Punctuated::<MetaNameValue, Token![,]>::parse_terminated
    );
    let impl_fn = syn::parse_macro_input!(input as ItemFn);

    let mut class = None;
    let mut method = None;
    for arg in args.iter() {
        if arg.path.is_ident("class") {
            class = Some(string_arg(arg));
        } else if arg.path.is_ident("name") {
            method = Some(string_arg(arg));
        } else {
            panic!("unknown jni_export argument (expected `class` or `name`)");
        }
    }
    let class = class.expect("jni_export requires `class = \"...\"`");
    let method = method.expect("jni_export requires `name = \"...\"`");

    let fn_name = &impl_fn.sig.ident;
    let generics = &impl_fn.sig.generics;
    let where_clause = &generics.where_clause;
    let output = &impl_fn.sig.output;

    let mut args_input = vec![];
    let mut args_named = vec![];

    for arg in impl_fn.sig.inputs.iter() {
        match arg {
            syn::FnArg::Receiver(_) => panic!("jni_export functions cannot take self"),
            syn::FnArg::Typed(pat) => {
                let ty = &pat.ty;
                match &*pat.pat {
                    syn::Pat::Ident(ident) => {
                        // drop `mut`; the wrapper only forwards the value
                        let ident = &ident.ident;
                        args_input.push(quote! { #ident: #ty });
                        args_named.push(quote! { #ident });
                    }
                    _ => panic!("jni_export arguments must be named"),
                }
            }
        }
    }

    let symbol = Ident::new(&symbol_name(&class, &method), Span::call_site());
    let doc = format!(" Native implementation of `{}.{}`.", class, method);

    quote! {
        #impl_fn

        #[doc = #doc]
        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "system" fn #symbol #generics (#(#args_input),*) #output #where_clause {
            #fn_name(#(#args_named),*)
        }
    }
    .into()
}
