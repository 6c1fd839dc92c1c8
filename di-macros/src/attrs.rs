//! Parsing of `#[injectable(...)]` and `#[inject]` attributes.

use syn::parse::Parse;
use syn::punctuated::Punctuated;
use syn::{
    parenthesized, DeriveInput, ExprPath, Field, GenericArgument, LitStr, Path, PathArguments,
    Token, Type,
};

/// How the container builds the type.
pub enum Constructor {
    /// `Default::default()`.
    Default,
    /// A user function returning `anyhow::Result<Self>`.
    Path(ExprPath),
    /// Not constructible without arguments.
    None,
}

pub struct InjectableArgs {
    pub provides: Vec<Type>,
    pub constructor: Constructor,
    pub krate: Path,
}

impl Default for InjectableArgs {
    fn default() -> Self {
        Self {
            provides: Vec::new(),
            constructor: Constructor::Default,
            krate: syn::parse_quote!(crate),
        }
    }
}

/// Parses every `#[injectable(...)]` attribute on the item.
pub fn parse_injectable_args(input: &DeriveInput) -> syn::Result<InjectableArgs> {
    let mut args = InjectableArgs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("injectable") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("provides") {
                // #[injectable(provides(dyn A, dyn B))]
                let content;
                parenthesized!(content in meta.input);
                let types: Punctuated<Type, Token![,]> =
                    content.parse_terminated(Type::parse, Token![,])?;
                args.provides.extend(types);
                Ok(())
            } else if meta.path.is_ident("constructor") {
                // #[injectable(constructor = "Self::connect")]
                let value: LitStr = meta.value()?.parse()?;
                args.constructor = Constructor::Path(value.parse()?);
                Ok(())
            } else if meta.path.is_ident("no_constructor") {
                args.constructor = Constructor::None;
                Ok(())
            } else if meta.path.is_ident("crate") {
                // #[injectable(crate = "trekbot")]
                let value: LitStr = meta.value()?.parse()?;
                args.krate = value.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported injectable attribute"))
            }
        })?;
    }

    Ok(args)
}

/// Whether the field carries `#[inject]`.
pub fn is_injection_point(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("inject"))
}

/// The `T` of an `Inject<T>` field type.
pub fn injected_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Inject" {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    match arguments.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
