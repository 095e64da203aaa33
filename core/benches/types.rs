use jsonapi_serializable::{DomainObject, ObjectRef, Related};
use serde_json::{json, Value};
use std::rc::Rc;

pub struct User {
    pub id: String,
    pub name: String,
    pub address: String,
    pub posts: Vec<Rc<Post>>,
}

pub struct Post {
    pub id: String,
    pub title: String,
}

impl DomainObject for User {
    fn class_name(&self) -> &'static str {
        "User"
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "address" => Some(json!(self.address)),
            _ => None,
        }
    }

    fn related(&self, name: &str) -> Related {
        match name {
            "posts" => Related::many(self.posts.iter().map(|post| post.clone() as ObjectRef)),
            _ => Related::None,
        }
    }
}

impl DomainObject for Post {
    fn class_name(&self) -> &'static str {
        "Post"
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "title" => Some(json!(self.title)),
            _ => None,
        }
    }
}

pub fn user_with_posts(count: usize) -> Rc<User> {
    let posts = (0..count)
        .map(|index| {
            Rc::new(Post {
                id: index.to_string(),
                title: format!("Post number {}", index),
            })
        })
        .collect();
    Rc::new(User {
        id: "1".to_owned(),
        name: "Lucas".to_owned(),
        address: "22 Ruby drive".to_owned(),
        posts,
    })
}
