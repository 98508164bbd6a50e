mod common;

use affine_resample::{sample, sample_index, FillPolicy, Image, ResampleError};
use common::synthetic_image::{linear_volume, ramp_2d};

#[test]
fn centre_of_ramp_blends_four_corners() {
    let _ = env_logger::builder().is_test(true).try_init();
    let img = ramp_2d(3, 3);
    assert_eq!(sample(&img, &[0.5, 0.5], FillPolicy::Zero).unwrap(), 3.0);
    assert_eq!(sample_index(&img, &[2.0, 2.0], FillPolicy::Zero).unwrap(), 9.0);
    assert_eq!(sample(&img, &[-1.0, 0.0], FillPolicy::Zero).unwrap(), 0.0);
    assert_eq!(sample(&img, &[-1.0, 0.0], FillPolicy::Nearest).unwrap(), 1.0);
}

#[test]
fn physical_points_follow_image_geometry() {
    let _ = env_logger::builder().is_test(true).try_init();
    let img = linear_volume([3, 3, 3])
        .with_spacing(&[2.0, 0.5, 1.0])
        .unwrap()
        .with_origin(&[-1.0, 4.0, 0.0])
        .unwrap();

    let point = img.index_to_physical(&[1.5, 0.5, 2.0]).unwrap();
    assert_eq!(point, vec![2.0, 4.25, 2.0]);
    let value = sample(&img, &point, FillPolicy::Zero).unwrap();
    assert!((value - 157.0).abs() < 1e-9, "got {value}");

    let back = img.physical_to_index(&point).unwrap();
    assert!((back[0] - 1.5).abs() < 1e-12);
    assert!((back[1] - 0.5).abs() < 1e-12);
    assert!((back[2] - 2.0).abs() < 1e-12);
}

#[test]
fn fill_policy_parsing_is_closed() {
    assert_eq!("Nearest".parse::<FillPolicy>().unwrap(), FillPolicy::Nearest);
    assert_eq!(FillPolicy::try_from(0).unwrap(), FillPolicy::Zero);
    assert_eq!(
        FillPolicy::try_from(7),
        Err(ResampleError::UnsupportedFillPolicy {
            value: "7".to_string()
        })
    );
    assert!("linear".parse::<FillPolicy>().is_err());
}

#[test]
fn wrong_point_dimension_is_rejected() {
    let img = Image::<u16>::new(&[2, 2]).unwrap();
    assert_eq!(
        sample(&img, &[0.0, 0.0, 0.0], FillPolicy::Zero),
        Err(ResampleError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    );
}
