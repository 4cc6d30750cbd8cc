/**
Implement traits to emulate vector-like element-wise addition for Vec<f64>
*/
use std::ops::{AddAssign, Neg};

pub trait ElementWiseAddAssign<T, Rhs = Self> {
    fn add_assign(&mut self, rhs: &Rhs);
}

impl<T> ElementWiseAddAssign<T> for Vec<T>
where
    T: Copy + AddAssign,
{
    fn add_assign(&mut self, other: &Self) {
        self.iter_mut()
            .zip(other.iter())
            .for_each(|(a, b)| *a += *b);
    }
}

/// Negate every element, e.g. to draw spin-down below the axis.
pub fn mirrored<T: Copy + Neg<Output = T>>(values: &[T]) -> Vec<T> {
    values.iter().map(|v| -*v).collect()
}

/// Subtract `offset` from every element, e.g. E - E_F.
pub fn shifted(values: &[f64], offset: f64) -> Vec<f64> {
    values.iter().map(|v| v - offset).collect()
}

#[cfg(test)]
#[test]
fn test_element_wise_add() {
    let mut vec_1: Vec<f64> = vec![0.0, 3.5, 4.25];
    let vec_2: Vec<f64> = vec![1.0, 6.5, -22.5];
    vec_1.add_assign(&vec_2);
    assert_eq!(vec_1, vec![1.0, 10.0, -18.25]);
    assert_eq!(mirrored(&vec_2), vec![-1.0, -6.5, 22.5]);
    assert_eq!(shifted(&[15.5, 16.0], 15.5), vec![0.0, 0.5]);
}
