use super::*;

#[test]
fn canvas_size_rejects_zero() {
    assert!(CanvasSize::new(0, 4).is_err());
    assert!(CanvasSize::new(4, 0).is_err());
    assert_eq!(CanvasSize::new(3, 2).unwrap().to_string(), "3x2");
}

#[test]
fn rgba_len_is_four_bytes_per_pixel() {
    let size = CanvasSize::new(3, 2).unwrap();
    assert_eq!(size.rgba_len().unwrap(), 24);
}

#[test]
fn transparent_raster_is_zeroed() {
    let r = Raster::transparent(CanvasSize::new(2, 2).unwrap()).unwrap();
    assert_eq!(r.data.len(), 16);
    assert!(r.data.iter().all(|&b| b == 0));
    assert_eq!(r.size(), CanvasSize::new(2, 2).unwrap());
}

#[test]
fn pixel_lookup_is_row_major_and_bounds_checked() {
    let mut r = Raster::transparent(CanvasSize::new(2, 2).unwrap()).unwrap();
    r.data[12..16].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(r.pixel(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(r.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(r.pixel(2, 0), None);
    assert_eq!(r.pixel(0, 2), None);
}
