use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use room_viewer::camera::{initial_view, CameraController, MoveKey};
use room_viewer::lighting::SceneLightingState;
use room_viewer::scene::compose;
use room_viewer::settings::CameraSettings;

/// Benchmark: one frame of movement integration with two keys held
fn bench_tick(c: &mut Criterion) {
    let mut camera = CameraController::from_view_matrix(initial_view(), CameraSettings::default());
    camera.on_key_down(MoveKey::Forward);
    camera.on_key_down(MoveKey::Left);

    c.bench_function("camera_tick", |b| {
        b.iter(|| {
            camera.tick(black_box(1.0 / 60.0));
            black_box(camera.position())
        })
    });
}

/// Benchmark: a look step followed by rebuilding the view matrix
fn bench_drag_and_view(c: &mut Criterion) {
    let mut camera = CameraController::default();

    c.bench_function("camera_drag_view_matrix", |b| {
        b.iter(|| {
            camera.on_mouse_drag(black_box(3.0), black_box(-1.5));
            black_box(camera.view_matrix())
        })
    });
}

/// Benchmark: importing a look-at matrix (decomposition into yaw/pitch/eye)
fn bench_import(c: &mut Criterion) {
    let view = initial_view();

    c.bench_function("camera_from_view_matrix", |b| {
        b.iter(|| CameraController::from_view_matrix(black_box(view), CameraSettings::default()))
    });
}

/// Benchmark: per-frame draw list at a few points in the pyramid's spin
fn bench_compose(c: &mut Criterion) {
    let lighting = SceneLightingState::default();
    let mut group = c.benchmark_group("scene_compose");

    for time in [0.0f32, 4.5, 120.0] {
        group.bench_with_input(BenchmarkId::from_parameter(time), &time, |b, &t| {
            b.iter(|| black_box(compose(black_box(t), &lighting)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_drag_and_view, bench_import, bench_compose);

criterion_main!(benches);
