use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Attribute,
    Expr,
    Ident,
    LitStr,
    Result,
    Token,
};

/// A single `tag = value` pair of the `signal` attribute.
enum Tag {
    Code(LitStr),
    Message(Expr),
    Help(Expr),
}

impl Parse for Tag {
    fn parse(input: ParseStream) -> Result<Self> {
        let ident = input.parse::<Ident>()?;
        input.parse::<Token![=]>()?;
        match ident.to_string().as_str() {
            "code" => Ok(Self::Code(input.parse()?)),
            "message" => Ok(Self::Message(input.parse()?)),
            "help" => Ok(Self::Help(input.parse()?)),
            other => Err(syn::Error::new_spanned(&ident, format!("unknown tag `{}`", other))),
        }
    }
}

/// The tags given to the `signal` attribute of a struct.
#[derive(Debug)]
pub struct SignalArgs {
    pub code: LitStr,
    pub message: Expr,
    pub help: Option<Expr>,
}

impl SignalArgs {
    /// Finds the `signal` attribute among `attrs` and reads its tags. `name` is the struct the
    /// attribute belongs to, and is where errors about missing tags point.
    pub fn from_attributes(name: &Ident, attrs: &[Attribute]) -> Result<Self> {
        let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("signal")) else {
            return Err(syn::Error::new(name.span(), "missing `signal` attribute"));
        };

        let tags = attr.parse_args_with(Punctuated::<Tag, Token![,]>::parse_terminated)?;
        let (mut code, mut message, mut help) = (None, None, None);
        for tag in tags {
            match tag {
                Tag::Code(lit) => code = Some(lit),
                Tag::Message(expr) => message = Some(expr),
                Tag::Help(expr) => help = Some(expr),
            }
        }

        let missing = |tag| syn::Error::new(name.span(), format!("missing `{}` tag in `signal` attribute", tag));
        Ok(Self {
            code: code.ok_or_else(|| missing("code"))?,
            message: message.ok_or_else(|| missing("message"))?,
            help,
        })
    }
}
