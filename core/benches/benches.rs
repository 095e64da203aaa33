mod types;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsonapi_serializable::{
    render, ClassSpec, Data, Exposures, ObjectRef, Relationship, RenderOptions, ResourceInstance,
    Schema,
};
use serde_json::json;
use std::sync::Arc;
use types::*;

fn user_schema() -> Schema {
    Schema::new("users")
        .attributes(["name", "address"])
        .relationship(
            "posts",
            Relationship::new().class(Schema::new("posts").attribute("title")),
        )
}

fn serialize(c: &mut Criterion) {
    let user = user_with_posts(100);
    let options = RenderOptions::new()
        .class(ClassSpec::map([("User", ClassSpec::from(user_schema()))]))
        .include(["posts"]);

    c.bench_function("Render user with 100 posts", |b| {
        b.iter(|| {
            let _ = render(Data::from(black_box(user.clone()) as ObjectRef), &options).unwrap();
        })
    });

    let standard = RenderOptions::new()
        .class(ClassSpec::map([("User", ClassSpec::from(user_schema()))]));
    c.bench_function("Render user without inclusion", |b| {
        b.iter(|| {
            let _ = render(Data::from(black_box(user.clone()) as ObjectRef), &standard).unwrap();
        })
    });
}

fn expensive_attributes(schema: Schema) -> Schema {
    schema.attribute_with("signature", |scope| {
        let id = scope.field("id").unwrap();
        let name = scope.field("name").unwrap();
        json!(format!("{}:{}", id, name).repeat(64))
    })
}

fn caching(c: &mut Criterion) {
    let uncached = Arc::new(expensive_attributes(Schema::new("users")));
    let cached = Arc::new(expensive_attributes(Schema::new("users").cached()));
    let user = user_with_posts(0);

    c.bench_function("Render attributes uncached", |b| {
        b.iter(|| {
            let resource = ResourceInstance::new(
                uncached.clone(),
                black_box(user.clone()) as ObjectRef,
                Exposures::new(),
            );
            let _ = resource.as_jsonapi().unwrap();
        })
    });
    c.bench_function("Render attributes cached", |b| {
        b.iter(|| {
            let resource = ResourceInstance::new(
                cached.clone(),
                black_box(user.clone()) as ObjectRef,
                Exposures::new(),
            );
            let _ = resource.as_jsonapi().unwrap();
        })
    });
}

criterion_group!(benches, serialize, caching);
criterion_main!(benches);
