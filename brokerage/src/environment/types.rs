use brokerage_core_blog_impl::BlogFeatureServiceImpl;
use brokerage_core_health_impl::HealthFeatureServiceImpl;
use brokerage_core_submission_impl::{
    dispatch::SubmissionDispatchServiceImpl, SubmissionFeatureServiceImpl,
};
use brokerage_email_impl::EmailServiceImpl;
use brokerage_extern_impl::cms::CmsApiServiceImpl;
use brokerage_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = brokerage_api_rest::RestServer<Health, Submission, Blog>;

// Core
pub type Health = HealthFeatureServiceImpl<Email>;
pub type Submission = SubmissionFeatureServiceImpl<SubmissionDispatch>;
pub type SubmissionDispatch = SubmissionDispatchServiceImpl<Email, Template>;
pub type Blog = BlogFeatureServiceImpl<CmsApi>;

// Extern
pub type CmsApi = CmsApiServiceImpl;

// Email
pub type Email = EmailServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;
