use crate::error::AccountError;
use crate::types::{
    CreateCustomerManagedKeyRequest, CreateWorkspaceRequest, UpdateWorkspaceRequest,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::borrow::Cow;

/// Everything that is not safe inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn encode_segment(segment: &str) -> Cow<'_, str> {
    utf8_percent_encode(segment, SEGMENT).into()
}

#[derive(Debug)]
pub(crate) enum Command<'a> {
    Get {
        path: &'a str,
    },
    Post {
        path: &'a str,
        body: Vec<u8>,
    },
    Patch {
        path: &'a str,
        body: Vec<u8>,
    },
    ListWorkspaces,
    GetWorkspace {
        workspace_id: &'a str,
    },
    CreateWorkspace {
        payload: &'a CreateWorkspaceRequest,
    },
    UpdateWorkspace {
        workspace_id: &'a str,
        payload: &'a UpdateWorkspaceRequest,
    },
    CreateCustomerManagedKey {
        payload: &'a CreateCustomerManagedKeyRequest,
    },
}

impl<'a> Command<'a> {
    pub(crate) fn post<B>(path: &'a str, body: &B) -> Result<Self, AccountError>
    where
        B: Serialize + ?Sized,
    {
        Ok(Command::Post {
            path,
            body: to_json(body)?,
        })
    }

    pub(crate) fn patch<B>(path: &'a str, body: &B) -> Result<Self, AccountError>
    where
        B: Serialize + ?Sized,
    {
        Ok(Command::Patch {
            path,
            body: to_json(body)?,
        })
    }

    pub(crate) fn http_method(&self) -> http::Method {
        match *self {
            Command::Get { .. } | Command::ListWorkspaces | Command::GetWorkspace { .. } => {
                http::Method::GET
            }
            Command::Post { .. }
            | Command::CreateWorkspace { .. }
            | Command::CreateCustomerManagedKey { .. } => http::Method::POST,
            Command::Patch { .. } | Command::UpdateWorkspace { .. } => http::Method::PATCH,
        }
    }

    /// Path relative to the account base URL
    pub(crate) fn path(&self) -> Cow<'a, str> {
        match *self {
            Command::Get { path } | Command::Post { path, .. } | Command::Patch { path, .. } => {
                Cow::Borrowed(path)
            }
            Command::ListWorkspaces | Command::CreateWorkspace { .. } => {
                Cow::Borrowed("/workspaces")
            }
            Command::GetWorkspace { workspace_id }
            | Command::UpdateWorkspace { workspace_id, .. } => {
                Cow::Owned(format!("/workspaces/{}", encode_segment(workspace_id)))
            }
            Command::CreateCustomerManagedKey { .. } => Cow::Borrowed("/customer-managed-keys"),
        }
    }

    /// JSON payload, `None` for requests without a body
    pub(crate) fn body(&self) -> Result<Option<Vec<u8>>, AccountError> {
        match self {
            Command::Post { body, .. } | Command::Patch { body, .. } => Ok(Some(body.clone())),
            Command::CreateWorkspace { payload } => to_json(payload).map(Some),
            Command::UpdateWorkspace { payload, .. } => to_json(payload).map(Some),
            Command::CreateCustomerManagedKey { payload } => to_json(payload).map(Some),
            Command::Get { .. } | Command::ListWorkspaces | Command::GetWorkspace { .. } => {
                Ok(None)
            }
        }
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, AccountError> {
    serde_json::to_vec(body).map_err(AccountError::Serialize)
}
