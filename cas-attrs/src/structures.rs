use crate::args::SignalArgs;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    Attribute,
    Fields,
    Ident,
    ItemStruct,
    Result,
};

/// A struct deriving `SignalKind`, together with the tags of its `signal` attribute.
#[derive(Debug)]
pub struct SignalKindTarget {
    pub name: Ident,
    pub fields: Fields,
    pub args: SignalArgs,
}

impl SignalKindTarget {
    /// Brings the named fields of `self` into scope, so that `message` and `help` can refer to
    /// them by name.
    fn bind_fields(&self) -> TokenStream2 {
        let name = &self.name;
        match &self.fields {
            Fields::Named(named) => {
                let idents = named.named.iter().filter_map(|field| field.ident.as_ref());
                quote! {
                    #[allow(unused_variables)]
                    let #name { #(#idents),* } = self;
                }
            },
            Fields::Unnamed(_) => quote_spanned! {
                name.span() => compile_error!("`SignalKind` cannot be derived for tuple structs");
            },
            Fields::Unit => TokenStream2::new(),
        }
    }
}

impl Parse for SignalKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let ItemStruct { ident, fields, .. } = input.parse()?;
        let args = SignalArgs::from_attributes(&ident, &attrs)?;
        Ok(Self { name: ident, fields, args })
    }
}

impl ToTokens for SignalKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let bindings = self.bind_fields();
        let SignalArgs { code, message, help } = &self.args;
        let help_body = help.as_ref().map_or_else(
            || quote! { None },
            |help| quote! {
                #bindings
                Some((#help).to_string())
            },
        );

        tokens.extend(quote! {
            fn code(&self) -> &'static str {
                #code
            }

            fn message(&self) -> String {
                use std::string::ToString;
                #bindings
                (#message).to_string()
            }

            fn help(&self) -> Option<String> {
                use std::string::ToString;
                #help_body
            }
        });
    }
}
