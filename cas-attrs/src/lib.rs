mod args;
mod structures;

use proc_macro::TokenStream;
use quote::quote;
use structures::SignalKindTarget;
use syn::parse_macro_input;

/// Derives the [`SignalKind`] trait for the given struct.
///
/// This trait can be derived for any kind of struct, except tuple structs.
///
/// The information of the signal is given using the `signal` attribute by adding the
/// corresponding tags to it:
/// ```
/// use cas_attrs::SignalKind;
/// use cas_error::SignalKind;
///
/// #[derive(Debug, SignalKind)]
/// #[signal(code = "expected-domain", message = "expected a domain", help = "add a `domain` field")]
/// pub struct ExpectedDomain;
///
/// assert_eq!(ExpectedDomain.code(), "expected-domain");
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                   |
/// | ----------- | ----------------------------------------------------------------------------- |
/// | `code`      | **Required.** A short, stable string literal identifying the kind of signal.  |
/// | `message`   | **Required.** The message displayed at the top of the signal's report.        |
/// | `help`      | Optional help text for the signal, describing what the user can do to fix it. |
///
/// `message` and `help` accept an expression that should evaluate to something implementing
/// [`ToString`]. For structs with named fields, the expression is evaluated with the members of
/// the struct in scope, so they can be used in the expression.
///
/// [`SignalKind`]: https://docs.rs/cas-error/latest/cas_error/trait.SignalKind.html
#[proc_macro_derive(SignalKind, attributes(signal))]
pub fn signal_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as SignalKindTarget);
    let name = &target.name;
    quote! {
        impl cas_error::SignalKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            #target
        }
    }.into()
}
