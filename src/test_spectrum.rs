#[cfg(test)]
mod test_spectrum {
    use crate::config::{WindowKind, FFT_SIZE, FRAME_SIZE, SAMPLE_RATE, SPECTRUM_SIZE};
    use crate::error::MfccError;
    use crate::helpers::{generate_sine_wave, peak_bin};
    use crate::spectrum::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spectrum_of_zeros() {
        let analyzer = SpectralAnalyzer::default();
        let spectrum = analyzer.analyze(&vec![0.0; FRAME_SIZE]).unwrap();
        assert_eq!(spectrum.len(), SPECTRUM_SIZE);
        assert!(spectrum.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_spectrum_of_constant() {
        let analyzer = SpectralAnalyzer::default();
        let spectrum = analyzer.analyze(&vec![1.0; FRAME_SIZE]).unwrap();

        // Zero padding doubles the resolution, so even bins other than DC vanish.
        assert_relative_eq!(spectrum[0], FRAME_SIZE as f32, max_relative = 1e-5);
        for k in (2..SPECTRUM_SIZE).step_by(2) {
            assert!(spectrum[k] < 1e-2, "bin {} = {}", k, spectrum[k]);
        }
    }

    #[test]
    fn test_impulse_is_flat() {
        let analyzer = SpectralAnalyzer::default();
        let mut frame = vec![0.0; FRAME_SIZE];
        frame[0] = 1.0;
        let spectrum = analyzer.analyze(&frame).unwrap();
        for magnitude in spectrum {
            assert_relative_eq!(magnitude, 1.0, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_matches_direct_dft() {
        let frame: Vec<f32> = (0..FRAME_SIZE)
            .map(|i| ((i * 7919) % 113) as f32 / 113.0 - 0.5)
            .collect();
        let spectrum = SpectralAnalyzer::default().analyze(&frame).unwrap();

        for &k in &[0usize, 1, 5, 100, 511, 1023] {
            let (mut re, mut im) = (0.0f64, 0.0f64);
            for (n, &x) in frame.iter().enumerate() {
                let angle = -2.0 * std::f64::consts::PI * (k * n) as f64 / FFT_SIZE as f64;
                re += x as f64 * angle.cos();
                im += x as f64 * angle.sin();
            }
            let expected = (re * re + im * im).sqrt() as f32;
            assert_relative_eq!(spectrum[k], expected, epsilon = 1e-3, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_frequency_resolution() {
        let freq = 440.0;
        let frame = generate_sine_wave(freq, SAMPLE_RATE as f32, FRAME_SIZE, 1.0);
        let spectrum = SpectralAnalyzer::default().analyze(&frame).unwrap();

        let max_index = peak_bin(&spectrum).unwrap();
        let expected_max_index = hz_to_bin(freq).round() as usize;
        assert_eq!(max_index, expected_max_index);

        let freq_error = (bin_to_hz(max_index as f32) - freq).abs();
        assert!(
            freq_error < bin_to_hz(1.0),
            "Frequency error is too high: {}",
            freq_error
        );
    }

    #[test]
    fn test_window_changes_output() {
        let frame = generate_sine_wave(1000.0, SAMPLE_RATE as f32, FRAME_SIZE, 0.5);
        let plain = SpectralAnalyzer::new(WindowKind::Rectangular)
            .analyze(&frame)
            .unwrap();
        let windowed = SpectralAnalyzer::new(WindowKind::Hamming)
            .analyze(&frame)
            .unwrap();
        assert_ne!(plain, windowed);
        assert_eq!(peak_bin(&plain), peak_bin(&windowed));
    }

    #[test]
    fn test_window_shapes() {
        let hann = hann_window(FRAME_SIZE);
        let hamming = hamming_window(FRAME_SIZE);
        assert_relative_eq!(hann[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(hamming[0], 0.08, epsilon = 1e-6);
        assert_relative_eq!(hann[FRAME_SIZE - 1], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_wrong_frame_length() {
        let err = SpectralAnalyzer::default().analyze(&[0.0; 10]).unwrap_err();
        assert!(matches!(
            err,
            MfccError::ShapeMismatch {
                expected: FRAME_SIZE,
                actual: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_bin_conversion() {
        assert_relative_eq!(hz_to_bin(bin_to_hz(46.0)), 46.0, epsilon = 1e-4);
        assert_relative_eq!(bin_to_hz(FFT_SIZE as f32 / 2.0), SAMPLE_RATE as f32 / 2.0);
    }
}
