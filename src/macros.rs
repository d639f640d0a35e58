/// Implements the common value-type traits for a three-component struct.
///
/// The struct must derive [`UniformArray`](uniform_array_derive::UniformArray)
/// so that indexing and `len()` are available.
#[macro_export]
macro_rules! impl_standard_traits {
    ($type_name:ident, $type_param:ident, $a:ident, $b:ident, $c:ident) => {
        impl<$type_param> Copy for $type_name<$type_param> where $type_param: Copy {}

        impl<$type_param> Clone for $type_name<$type_param>
        where
            $type_param: Clone,
        {
            fn clone(&self) -> Self {
                Self {
                    $a: self.$a.clone(),
                    $b: self.$b.clone(),
                    $c: self.$c.clone(),
                }
            }
        }

        impl<$type_param> Default for $type_name<$type_param>
        where
            $type_param: Default,
        {
            #[inline]
            fn default() -> Self {
                Self {
                    $a: Default::default(),
                    $b: Default::default(),
                    $c: Default::default(),
                }
            }
        }

        impl<$type_param> core::fmt::Debug for $type_name<$type_param>
        where
            $type_param: core::fmt::Debug,
        {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_tuple(stringify!($type_name))
                    .field(&self.$a)
                    .field(&self.$b)
                    .field(&self.$c)
                    .finish()
            }
        }

        impl<$type_param> PartialEq for $type_name<$type_param>
        where
            $type_param: PartialEq,
        {
            fn eq(&self, other: &Self) -> bool {
                self.$a == other.$a && self.$b == other.$b && self.$c == other.$c
            }
        }

        impl<$type_param> core::ops::Add<$type_name<$type_param>> for $type_name<$type_param>
        where
            $type_param: core::ops::Add<$type_param, Output = $type_param>,
        {
            type Output = $type_name<$type_param>;

            #[inline]
            fn add(self, rhs: $type_name<$type_param>) -> Self::Output {
                Self {
                    $a: self.$a + rhs.$a,
                    $b: self.$b + rhs.$b,
                    $c: self.$c + rhs.$c,
                }
            }
        }

        impl<$type_param> core::ops::Sub<$type_name<$type_param>> for $type_name<$type_param>
        where
            $type_param: core::ops::Sub<$type_param, Output = $type_param>,
        {
            type Output = $type_name<$type_param>;

            #[inline]
            fn sub(self, rhs: $type_name<$type_param>) -> Self::Output {
                Self {
                    $a: self.$a - rhs.$a,
                    $b: self.$b - rhs.$b,
                    $c: self.$c - rhs.$c,
                }
            }
        }

        impl<$type_param> core::ops::Mul<$type_param> for $type_name<$type_param>
        where
            $type_param: core::ops::Mul<$type_param, Output = $type_param> + Clone,
        {
            type Output = $type_name<$type_param>;

            #[inline]
            fn mul(self, rhs: $type_param) -> Self::Output {
                Self {
                    $a: self.$a * rhs.clone(),
                    $b: self.$b * rhs.clone(),
                    $c: self.$c * rhs.clone(),
                }
            }
        }

        impl<$type_param> $crate::AllFinite for $type_name<$type_param>
        where
            $type_param: ::num_traits::float::FloatCore,
        {
            #[inline]
            fn all_finite(&self) -> bool {
                self.$a.is_finite() && self.$b.is_finite() && self.$c.is_finite()
            }
        }

        #[cfg(test)]
        paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:snake>] {
                use super::*;
                use $crate::AllFinite;

                #[test]
                fn test_len() {
                    let value = $type_name::<f32>::default();
                    assert_eq!(value.len(), 3);
                }

                #[test]
                fn test_index() {
                    let value = $type_name::<f32> {
                        $a: 1.0,
                        $b: 2.0,
                        $c: 3.0,
                    };

                    assert_eq!(value[0], 1.0);
                    assert_eq!(value[1], 2.0);
                    assert_eq!(value[2], 3.0);
                }

                #[test]
                fn test_arithmetic() {
                    let lhs = $type_name::<f64> { $a: 1.0, $b: 2.0, $c: 3.0 };
                    let rhs = $type_name::<f64> { $a: 0.5, $b: -1.0, $c: 3.0 };

                    assert_eq!(lhs + rhs, $type_name { $a: 1.5, $b: 1.0, $c: 6.0 });
                    assert_eq!(lhs - rhs, $type_name { $a: 0.5, $b: 3.0, $c: 0.0 });
                    assert_eq!(lhs * 2.0, $type_name { $a: 2.0, $b: 4.0, $c: 6.0 });
                }

                #[test]
                fn test_all_finite() {
                    let finite = $type_name::<f64> { $a: 1.0, $b: 2.0, $c: 3.0 };
                    let nan = $type_name::<f64> { $a: 1.0, $b: f64::NAN, $c: 3.0 };
                    let inf = $type_name::<f64> { $a: f64::INFINITY, $b: 2.0, $c: 3.0 };

                    assert!(finite.all_finite());
                    assert!(!nan.all_finite());
                    assert!(!inf.all_finite());
                }
            }
        }
    };
}
