//! Implementation of #[derive(Injectable)] proc-macro.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields};

use crate::attrs::{injected_type, is_injection_point, parse_injectable_args, Constructor};

pub fn derive_injectable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Injectable cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Injectable can only be derived for structs with named fields or unit structs",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Injectable can only be derived for structs",
            ));
        }
    };

    let args = parse_injectable_args(input)?;
    let krate = &args.krate;

    let constructor = match &args.constructor {
        Constructor::Default => quote! {
            .constructor(|| ::core::result::Result::Ok(<Self as ::core::default::Default>::default()))
        },
        Constructor::Path(path) => quote! { .constructor(#path) },
        Constructor::None => quote! {},
    };

    let provides = args.provides.iter().map(|contract| {
        quote! {
            .provides::<#contract>(
                |this: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#contract> { this }
            )
        }
    });

    // Generate one injection point per #[inject] field
    let mut injections = Vec::new();
    for field in fields.into_iter().filter(|field| is_injection_point(field)) {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let dependency = injected_type(&field.ty).ok_or_else(|| {
            syn::Error::new_spanned(&field.ty, "#[inject] fields must have type Inject<T>")
        })?;
        let field_str = field_name.to_string();

        injections.push(quote! {
            .inject::<#dependency>(#field_str, |this: &Self| &this.#field_name)
        });
    }

    let entry = format_ident!("__INJECTABLE_{}", name.to_string().to_uppercase());

    Ok(quote! {
        impl #krate::di::Injectable for #name {
            fn descriptor() -> #krate::di::TypeDescriptor {
                #krate::di::TypeDescriptor::concrete::<Self>()
                    #constructor
                    #(#provides)*
                    #(#injections)*
                    .into()
            }
        }

        #[#krate::di::linkme::distributed_slice(#krate::di::INJECTABLES)]
        #[linkme(crate = #krate::di::linkme)]
        #[doc(hidden)]
        static #entry: #krate::di::InjectableEntry = #krate::di::InjectableEntry {
            name: ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#name)),
            descriptor: <#name as #krate::di::Injectable>::descriptor,
        };
    })
}
