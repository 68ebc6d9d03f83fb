/// Rectified linear unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl Relu {
    pub fn f(&self, z: f32) -> f32 {
        z.max(0.)
    }

    // The derivative at 0 is taken as 0.
    pub fn df(&self, z: f32) -> f32 {
        if z > 0. { 1. } else { 0. }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ActFn, Sigmoid};
    use super::*;

    #[test]
    fn relu_clamps_negatives() {
        assert_eq!(Relu.f(-3.), 0.);
        assert_eq!(Relu.f(2.5), 2.5);
        assert_eq!(Relu.df(-1.), 0.);
        assert_eq!(Relu.df(1.), 1.);
    }

    #[test]
    fn sigmoid_derivative_matches_finite_difference() {
        let sigmoid = Sigmoid::new(1.);
        let h = 1e-3;

        for z in [-2.0f32, -0.5, 0.0, 0.7, 3.0] {
            let numeric = (sigmoid.f(z + h) - sigmoid.f(z - h)) / (2. * h);
            assert!((numeric - sigmoid.df(z)).abs() < 1e-3, "z={z}");
        }
    }

    #[test]
    fn act_fn_round_trips_through_its_spec() {
        for act_fn in [ActFn::sigmoid(2.), ActFn::tanh(), ActFn::relu()] {
            let spec = act_fn.spec();
            assert_eq!(ActFn::from(spec).spec(), spec);
        }
    }
}
