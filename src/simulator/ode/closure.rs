use diffsol::{
    ConstantOp, LinearOp, NonLinearOp, NonLinearOpJacobian, OdeEquations, OdeEquationsRef, Op,
};

use crate::simulator::model::BoundModel;

type T = f64;
type V = nalgebra::DVector<f64>;
type M = nalgebra::DMatrix<f64>;

pub struct KineticRhs<'a> {
    nstates: usize,
    model: &'a BoundModel,
}

impl<'a> Op for KineticRhs<'a> {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        self.nstates
    }
    fn nparams(&self) -> usize {
        0
    }
}

pub struct KineticMass {
    nstates: usize,
}

impl Op for KineticMass {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        self.nstates
    }
    fn nparams(&self) -> usize {
        0
    }
}

pub struct KineticInit {
    nstates: usize,
    init: V,
}

impl Op for KineticInit {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        self.nstates
    }
    fn nparams(&self) -> usize {
        0
    }
}

pub struct KineticRoot {
    nstates: usize,
}

impl Op for KineticRoot {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        0
    }
    fn nparams(&self) -> usize {
        0
    }
}

pub struct KineticOut {
    nstates: usize,
}

impl Op for KineticOut {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        self.nstates
    }
    fn nparams(&self) -> usize {
        0
    }
}

impl<'a> NonLinearOp for KineticRhs<'a> {
    fn call_inplace(&self, x: &Self::V, _t: Self::T, y: &mut Self::V) {
        self.model.rhs(x.as_slice(), y.as_mut_slice());
    }
}

impl<'a> NonLinearOpJacobian for KineticRhs<'a> {
    /// Forward-difference approximation of J(x) * v
    fn jac_mul_inplace(&self, x: &Self::V, _t: Self::T, v: &Self::V, y: &mut Self::V) {
        let vnorm = v.norm();
        if vnorm == 0.0 {
            y.fill(0.0);
            return;
        }
        let h = f64::EPSILON.sqrt() * (1.0 + x.norm()) / vnorm;
        let shifted = x + v * h;

        let mut f0 = V::zeros(self.nstates);
        self.model.rhs(x.as_slice(), f0.as_mut_slice());
        self.model.rhs(shifted.as_slice(), y.as_mut_slice());
        y.axpy(-1.0 / h, &f0, 1.0 / h);
    }
}

impl LinearOp for KineticMass {
    fn gemv_inplace(&self, _x: &Self::V, _t: Self::T, _beta: Self::T, _y: &mut Self::V) {}
}

impl ConstantOp for KineticInit {
    fn call_inplace(&self, _t: Self::T, y: &mut Self::V) {
        y.copy_from(&self.init);
    }
}

impl NonLinearOp for KineticRoot {
    fn call_inplace(&self, _x: &Self::V, _t: Self::T, _y: &mut Self::V) {}
}

impl NonLinearOp for KineticOut {
    fn call_inplace(&self, _x: &Self::V, _t: Self::T, _y: &mut Self::V) {}
}

/// A bound kinetic model together with its initial concentrations
pub struct KineticProblem {
    model: BoundModel,
    nstates: usize,
    init: V,
}

impl KineticProblem {
    pub fn new(model: BoundModel, init: V) -> Self {
        let nstates = model.nstates();
        Self {
            model,
            nstates,
            init,
        }
    }
}

impl Op for KineticProblem {
    type T = T;
    type V = V;
    type M = M;
    fn nstates(&self) -> usize {
        self.nstates
    }
    fn nout(&self) -> usize {
        self.nstates
    }
    fn nparams(&self) -> usize {
        0
    }
}

impl<'b> OdeEquationsRef<'b> for KineticProblem {
    type Rhs = KineticRhs<'b>;
    type Mass = KineticMass;
    type Init = KineticInit;
    type Root = KineticRoot;
    type Out = KineticOut;
}

impl OdeEquations for KineticProblem {
    fn rhs(&self) -> KineticRhs<'_> {
        KineticRhs {
            nstates: self.nstates,
            model: &self.model,
        }
    }

    fn mass(&self) -> Option<KineticMass> {
        None
    }

    fn init(&self) -> KineticInit {
        KineticInit {
            nstates: self.nstates,
            init: self.init.clone(),
        }
    }

    fn get_params(&self, _p: &mut V) {}

    fn root(&self) -> Option<KineticRoot> {
        None
    }

    fn out(&self) -> Option<KineticOut> {
        None
    }

    // Kinetic constants are bound into the model, there is nothing to set
    fn set_params(&mut self, _p: &V) {}
}
