//! Reversible Michaelis-Menten rate forms.
//!
//! The metabolic reactions use forward and reverse turnover numbers instead of the
//! geometric-mean form found in SBML exports:
//!
//! ```text
//! v = onoff * E * (kcatF * prod(S/KmS) - kcatR * prod(P/KmP))
//!               / (prod(1 + S/KmS) + prod(1 + P/KmP) - 1)
//! ```
//!
//! [EnzymaticRate::template] renders the form as a `$`-parameter string for model
//! exchange, [enzymatic_rate] evaluates it.

use serde::{Deserialize, Serialize};

use crate::error::CellError;

/// Enzymatic rate form with `subs` substrates and `prods` products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnzymaticRate {
    subs: usize,
    prods: usize,
}

impl EnzymaticRate {
    pub fn new(subs: usize, prods: usize) -> Result<Self, CellError> {
        if subs == 0 || prods == 0 {
            return Err(CellError::InvalidRateForm(format!(
                "an enzymatic rate needs at least one substrate and one product, got {} and {}",
                subs, prods
            )));
        }
        Ok(Self { subs, prods })
    }

    pub fn subs(&self) -> usize {
        self.subs
    }

    pub fn prods(&self) -> usize {
        self.prods
    }

    /// Conventional registration name, `enz_<subs>_<prods>`
    pub fn name(&self) -> String {
        format!("enz_{}_{}", self.subs, self.prods)
    }

    /// Parameter names referenced by the template, in order of first appearance
    pub fn parameters(&self) -> Vec<String> {
        let mut names = vec![
            "onoff".to_string(),
            "Enzyme".to_string(),
            "kcatF".to_string(),
        ];
        for i in 1..=self.subs {
            names.push(format!("Sub{}", i));
            names.push(format!("KmSub{}", i));
        }
        names.push("kcatR".to_string());
        for i in 1..=self.prods {
            names.push(format!("Prod{}", i));
            names.push(format!("KmProd{}", i));
        }
        names
    }

    /// The rate law as a `$`-parameter string
    pub fn template(&self) -> String {
        enzymatic_template(self.subs, self.prods)
    }
}

fn join_terms(n: usize, term: impl Fn(usize) -> String) -> String {
    (1..=n).map(term).collect::<Vec<_>>().join(" * ")
}

/// Render the enzymatic rate string for `subs` substrates and `prods` products
pub fn enzymatic_template(subs: usize, prods: usize) -> String {
    let sub_numer = join_terms(subs, |i| format!("( $Sub{i} / $KmSub{i} )"));
    let prod_numer = join_terms(prods, |i| format!("( $Prod{i} / $KmProd{i} )"));
    let numerator = format!("( $kcatF * {} - $kcatR * {} )", sub_numer, prod_numer);

    let sub_denom = join_terms(subs, |i| format!("( 1 + $Sub{i} / $KmSub{i} )"));
    let prod_denom = join_terms(prods, |i| format!("( 1 + $Prod{i} / $KmProd{i} )"));
    let denominator = format!("( {} + {} - 1 )", sub_denom, prod_denom);

    format!("$onoff * $Enzyme * ( {} / {} )", numerator, denominator)
}

/// Evaluate the enzymatic rate.
///
/// `subs` and `prods` yield `(concentration, Km)` pairs in mM.
#[inline]
pub fn enzymatic_rate(
    onoff: f64,
    enzyme: f64,
    kcat_f: f64,
    kcat_r: f64,
    subs: impl IntoIterator<Item = (f64, f64)>,
    prods: impl IntoIterator<Item = (f64, f64)>,
) -> f64 {
    let (sub_numer, sub_denom) = saturation(subs);
    let (prod_numer, prod_denom) = saturation(prods);
    onoff * enzyme * ((kcat_f * sub_numer - kcat_r * prod_numer) / (sub_denom + prod_denom - 1.0))
}

#[inline]
fn saturation(terms: impl IntoIterator<Item = (f64, f64)>) -> (f64, f64) {
    terms
        .into_iter()
        .fold((1.0, 1.0), |(numer, denom), (conc, km)| {
            let ratio = conc / km;
            (numer * ratio, denom * (1.0 + ratio))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn one_to_one_template() {
        assert_eq!(
            enzymatic_template(1, 1),
            "$onoff * $Enzyme * ( ( $kcatF * ( $Sub1 / $KmSub1 ) - $kcatR * ( $Prod1 / $KmProd1 ) ) / ( ( 1 + $Sub1 / $KmSub1 ) + ( 1 + $Prod1 / $KmProd1 ) - 1 ) )"
        );
    }

    #[test]
    fn two_to_one_template_multiplies_the_substrate_terms() {
        let template = EnzymaticRate::new(2, 1).unwrap().template();
        assert!(template.contains("( $Sub1 / $KmSub1 ) * ( $Sub2 / $KmSub2 )"));
        assert!(template.contains("( 1 + $Sub1 / $KmSub1 ) * ( 1 + $Sub2 / $KmSub2 )"));
    }

    #[test]
    fn every_parameter_appears_in_the_template() {
        let form = EnzymaticRate::new(3, 2).unwrap();
        let template = form.template();
        for name in form.parameters() {
            assert!(template.contains(&format!("${}", name)), "{} missing", name);
        }
    }

    #[test]
    fn empty_sides_are_rejected() {
        assert!(EnzymaticRate::new(0, 1).is_err());
        assert!(EnzymaticRate::new(1, 0).is_err());
    }

    #[test]
    fn rate_matches_the_closed_form() {
        // S = 2, KmS = 1, P = 1, KmP = 2
        let v = enzymatic_rate(1.0, 0.5, 10.0, 4.0, [(2.0, 1.0)], [(1.0, 2.0)]);
        let expected = 0.5 * (10.0 * 2.0 - 4.0 * 0.5) / (3.0 + 1.5 - 1.0);
        assert_relative_eq!(v, expected);
    }

    #[test]
    fn rate_vanishes_at_equilibrium_and_when_switched_off() {
        // kcatF * S/KmS == kcatR * P/KmP
        let v = enzymatic_rate(1.0, 1.0, 2.0, 4.0, [(1.0, 1.0)], [(1.0, 2.0)]);
        assert_relative_eq!(v, 0.0);
        let off = enzymatic_rate(0.0, 1.0, 2.0, 1.0, [(5.0, 1.0)], [(0.0, 1.0)]);
        assert_relative_eq!(off, 0.0);
    }
}
